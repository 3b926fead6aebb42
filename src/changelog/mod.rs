pub mod entry;
pub mod sections;

pub use entry::{ConventionalCommit, parse_conventional_commit, render_entry};
pub use sections::{ChangelogSection, default_sections};
