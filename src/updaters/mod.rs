pub mod description;
pub mod news;

pub use description::DescriptionUpdater;
pub use news::News;
