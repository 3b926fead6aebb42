use clap::{Parser, Subcommand};
use rrelease::Ecosystem;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rrelease",
    about = "Plan R package releases - NEWS.md entries and DESCRIPTION versions",
    version,
    author
)]
pub struct Cli {
    /// Path to the repository root (defaults to current directory)
    #[arg(short, long, default_value = ".", global = true)]
    pub path: String,

    /// Config file (defaults to rrelease.toml in the repository root)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Package directory inside the repository, for monorepos
    #[arg(long, global = true, value_name = "DIR")]
    pub package_path: Option<String>,

    /// Changelog file relative to the package directory
    #[arg(long, global = true, value_name = "FILE")]
    pub changelog_path: Option<String>,

    /// Branch releases are cut from
    #[arg(long, global = true, value_name = "BRANCH")]
    pub target_branch: Option<String>,

    /// Packaging ecosystem of the package
    #[arg(long, value_enum, global = true)]
    pub ecosystem: Option<Ecosystem>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the files a release would change, optionally writing them
    Plan {
        /// Version being released
        #[arg(long = "release-version", value_name = "VERSION")]
        release_version: String,

        /// Changelog entry text
        #[arg(long, conflicts_with_all = ["entry_file", "commits", "since"])]
        entry: Option<String>,

        /// Read the changelog entry from a file
        #[arg(long, value_name = "FILE", conflicts_with_all = ["commits", "since"])]
        entry_file: Option<PathBuf>,

        /// Conventional commit subject to render into the entry (repeatable)
        #[arg(long = "commit", value_name = "SUBJECT", conflicts_with = "since")]
        commits: Vec<String>,

        /// Render the entry from commits after this git ref (e.g. the last tag)
        #[arg(long, value_name = "REF")]
        since: Option<String>,

        /// Write the changes into the working tree
        #[arg(long)]
        apply: bool,
    },

    /// Print the package name declared in DESCRIPTION
    Name {
        /// Read from a GitHub repository instead of the local clone
        #[arg(long, value_name = "OWNER/REPO")]
        github: Option<String>,

        /// GitHub token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// GitHub API base URL, for GitHub Enterprise
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,
    },

    /// Print the version used for a package's first release
    InitialVersion,
}
