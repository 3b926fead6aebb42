use crate::changelog::ChangelogSection;
use crate::error::{ReleaseError, Result};
use crate::strategy::Ecosystem;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TARGET_BRANCH: &str = "main";
pub const CONFIG_FILE_NAME: &str = "rrelease.toml";

/// Options shared by every release strategy.
///
/// `changelog_path` and `changelog_sections` are left unset to let the
/// strategy pick its ecosystem defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StrategyOptions {
    /// Package location inside the repository; `None` or `"."` is the root.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_target_branch")]
    pub target_branch: String,
    #[serde(default)]
    pub changelog_path: Option<String>,
    #[serde(default)]
    pub changelog_sections: Option<Vec<ChangelogSection>>,
}

fn default_target_branch() -> String {
    DEFAULT_TARGET_BRANCH.to_string()
}

impl Default for StrategyOptions {
    fn default() -> Self {
        Self {
            path: None,
            target_branch: default_target_branch(),
            changelog_path: None,
            changelog_sections: None,
        }
    }
}

impl StrategyOptions {
    /// Joins `file` onto the package path.
    pub fn add_path(&self, file: &str) -> String {
        let file = file.trim_start_matches(['/', '\\']);
        match self.path.as_deref() {
            None | Some("") | Some(".") => file.to_string(),
            Some(path) => {
                let path = path.trim_end_matches(['/', '\\']);
                format!("{path}/{file}")
            }
        }
    }
}

/// Contents of an `rrelease.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseConfig {
    #[serde(default)]
    pub ecosystem: Option<Ecosystem>,
    #[serde(flatten)]
    pub options: StrategyOptions,
}

impl ReleaseConfig {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ReleaseError::Config(format!("Failed to read '{}': {e}", path.display()))
        })?;
        Self::parse(&content)
    }

    /// Loads `explicit` when given, otherwise `rrelease.toml` in `root` if present.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            if std::env::var(crate::VERBOSE_ENV).is_ok() {
                eprintln!("[VERBOSE] Using config {}", candidate.display());
            }
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}
