use serde::{Deserialize, Serialize};

/// Maps a conventional commit type to the changelog heading it is listed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogSection {
    #[serde(rename = "type")]
    pub commit_type: String,
    pub section: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

impl ChangelogSection {
    pub fn new(commit_type: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            commit_type: commit_type.into(),
            section: section.into(),
            hidden: false,
        }
    }

    pub fn hidden(commit_type: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            hidden: true,
            ..Self::new(commit_type, section)
        }
    }
}

/// Default classification table for R packages, in rendering order.
pub fn default_sections() -> Vec<ChangelogSection> {
    vec![
        ChangelogSection::new("feat", "Features"),
        ChangelogSection::new("fix", "Bug Fixes"),
        ChangelogSection::new("perf", "Performance Improvements"),
        ChangelogSection::new("deps", "Dependencies"),
        ChangelogSection::new("revert", "Reverts"),
        ChangelogSection::new("docs", "Documentation"),
        ChangelogSection::hidden("style", "Styles"),
        ChangelogSection::hidden("chore", "Miscellaneous Chores"),
        ChangelogSection::hidden("refactor", "Code Refactoring"),
        ChangelogSection::hidden("test", "Tests"),
        ChangelogSection::hidden("build", "Build System"),
        ChangelogSection::hidden("ci", "Continuous Integration"),
    ]
}
