use crate::error::Result;
use std::fmt::Debug;

/// Rewrites the content of one file for a release.
pub trait Updater: Debug + Send + Sync {
    /// Short label used when printing a plan.
    fn name(&self) -> &'static str;

    /// Produce the new file content. `None` means the file does not exist yet.
    fn update_content(&self, content: Option<&str>) -> Result<String>;
}

/// One file to change when cutting a release.
#[derive(Debug)]
pub struct Update {
    /// Repository-relative path, already joined with the package path.
    pub path: String,
    /// Whether the applier may create the file when it is missing.
    pub create_if_missing: bool,
    pub updater: Box<dyn Updater>,
}

impl Update {
    pub fn new(path: impl Into<String>, create_if_missing: bool, updater: impl Updater + 'static) -> Self {
        Self {
            path: path.into(),
            create_if_missing,
            updater: Box::new(updater),
        }
    }
}
