use crate::error::{ReleaseError, Result};
use crate::update::Updater;
use crate::version::Version;
use regex::Regex;
use std::sync::LazyLock;

static VERSION_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?P<key>Version:[ \t]*)(?P<value>[^\s]+)").expect("version pattern is valid")
});

/// Rewrites the `Version:` field of an R `DESCRIPTION` file.
#[derive(Debug, Clone)]
pub struct DescriptionUpdater {
    pub version: Version,
}

impl DescriptionUpdater {
    pub fn new(version: Version) -> Self {
        Self { version }
    }
}

impl Updater for DescriptionUpdater {
    fn name(&self) -> &'static str {
        "description"
    }

    fn update_content(&self, content: Option<&str>) -> Result<String> {
        let content = content.ok_or_else(|| {
            ReleaseError::Manifest("DESCRIPTION does not exist and will not be created".to_string())
        })?;

        let Some(captures) = VERSION_FIELD.captures(content) else {
            return Err(ReleaseError::Manifest(
                "DESCRIPTION has no Version field".to_string(),
            ));
        };

        // Only the value span changes; every other byte is kept as-is
        let value = captures
            .name("value")
            .ok_or_else(|| ReleaseError::Manifest("Version field is empty".to_string()))?;

        if std::env::var(crate::VERBOSE_ENV).is_ok() {
            eprintln!(
                "[VERBOSE] DESCRIPTION version {} -> {}",
                value.as_str(),
                self.version
            );
        }

        let mut updated = String::with_capacity(content.len());
        updated.push_str(&content[..value.start()]);
        updated.push_str(&self.version.to_string());
        updated.push_str(&content[value.end()..]);
        Ok(updated)
    }
}
