//! Release planning for R packages.
//!
//! Given the next version and its changelog entry, a [`Strategy`] lists the
//! files to change (`NEWS.md`, `DESCRIPTION`) and how to change them. It can
//! also read the package name from `DESCRIPTION` through a
//! [`RepositoryClient`].

pub mod apply;
pub mod changelog;
pub mod config;
pub mod error;
pub mod repository;
pub mod strategy;
pub mod update;
pub mod updaters;
pub mod utils;
pub mod version;

/// Set to any value to print `[VERBOSE]` diagnostics on stderr.
pub const VERBOSE_ENV: &str = "RRELEASE_VERBOSE";

pub use config::StrategyOptions;
pub use error::{ReleaseError, Result};
pub use repository::{FileContents, RepositoryClient};
pub use strategy::{BuildUpdatesOptions, Ecosystem, ReleaseStrategy, Strategy};
pub use update::{Update, Updater};
pub use version::Version;
