use crate::config::StrategyOptions;
use crate::error::Result;
use crate::repository::RepositoryClient;
use crate::update::Update;
use crate::version::Version;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub mod r;

pub use r::RStrategy;

/// Release facts handed to a strategy once the next version is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildUpdatesOptions {
    pub new_version: Version,
    pub changelog_entry: String,
}

/// What a packaging ecosystem contributes to a release.
#[async_trait]
pub trait ReleaseStrategy: Send + Sync {
    /// Files to change for `options.new_version`, in the order they should be applied.
    fn build_updates(&self, options: &BuildUpdatesOptions) -> Vec<Update>;

    /// Version used when the package has never been released.
    fn initial_release_version(&self) -> Version;

    /// Name declared by the package manifest, `None` when there is none yet.
    async fn package_name(&self) -> Result<Option<String>>;
}

/// Packaging ecosystems with a release strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// R packages (`DESCRIPTION` + `NEWS.md`)
    R,
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ecosystem::R => write!(f, "r"),
        }
    }
}

/// A strategy selected by ecosystem.
pub enum Strategy {
    R(RStrategy),
}

impl Strategy {
    pub fn new(
        ecosystem: Ecosystem,
        options: StrategyOptions,
        client: Arc<dyn RepositoryClient>,
    ) -> Self {
        match ecosystem {
            Ecosystem::R => Strategy::R(RStrategy::new(options, client)),
        }
    }

    pub fn ecosystem(&self) -> Ecosystem {
        match self {
            Strategy::R(_) => Ecosystem::R,
        }
    }

    pub fn changelog_path(&self) -> &str {
        match self {
            Strategy::R(strategy) => strategy.changelog_path(),
        }
    }

    pub fn changelog_sections(&self) -> &[crate::changelog::ChangelogSection] {
        match self {
            Strategy::R(strategy) => strategy.changelog_sections(),
        }
    }
}

#[async_trait]
impl ReleaseStrategy for Strategy {
    fn build_updates(&self, options: &BuildUpdatesOptions) -> Vec<Update> {
        match self {
            Strategy::R(strategy) => strategy.build_updates(options),
        }
    }

    fn initial_release_version(&self) -> Version {
        match self {
            Strategy::R(strategy) => strategy.initial_release_version(),
        }
    }

    async fn package_name(&self) -> Result<Option<String>> {
        match self {
            Strategy::R(strategy) => strategy.package_name_from_description().await,
        }
    }
}
