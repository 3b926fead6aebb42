use colored::Colorize;
use rrelease::apply::{ApplyOutcome, ApplyReport, apply_updates};
use rrelease::changelog::{parse_conventional_commit, render_entry};
use rrelease::config::ReleaseConfig;
use rrelease::repository::{LocalGitRepository, RepositoryFactory};
use rrelease::utils::PathValidator;
use rrelease::{
    BuildUpdatesOptions, Ecosystem, ReleaseError, ReleaseStrategy, Result, Strategy,
    StrategyOptions, Update, Version,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Strategy settings after merging the config file with command-line flags.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub root: PathBuf,
    pub ecosystem: Ecosystem,
    pub options: StrategyOptions,
}

/// Flags that override values from the config file.
#[derive(Debug, Default)]
pub struct Overrides<'a> {
    pub config: Option<&'a Path>,
    pub package_path: Option<&'a str>,
    pub changelog_path: Option<&'a str>,
    pub target_branch: Option<&'a str>,
    pub ecosystem: Option<Ecosystem>,
}

pub fn resolve_settings<P: AsRef<Path>>(path: P, overrides: Overrides<'_>) -> Result<ResolvedSettings> {
    let root = PathValidator::validate_project_path(path)?;
    let config = ReleaseConfig::discover(&root, overrides.config)?;

    let mut options = config.options;
    if let Some(package_path) = overrides.package_path {
        options.path = Some(package_path.to_string());
    }
    if let Some(changelog_path) = overrides.changelog_path {
        options.changelog_path = Some(changelog_path.to_string());
    }
    if let Some(target_branch) = overrides.target_branch {
        options.target_branch = target_branch.to_string();
    }

    let ecosystem = overrides
        .ecosystem
        .or(config.ecosystem)
        .unwrap_or(Ecosystem::R);

    Ok(ResolvedSettings {
        root,
        ecosystem,
        options,
    })
}

/// Where the changelog entry for `plan` comes from.
#[derive(Debug)]
pub enum EntrySource {
    Text(String),
    File(PathBuf),
    Commits(Vec<String>),
    GitRange(String),
}

/// Execute the plan workflow
pub async fn execute_plan(
    settings: ResolvedSettings,
    release_version: &str,
    entry_source: EntrySource,
    apply: bool,
) -> Result<()> {
    let version = Version::parse(release_version)?;
    let local = Arc::new(LocalGitRepository::new(&settings.root)?);
    let strategy = Strategy::new(settings.ecosystem, settings.options.clone(), local.clone());

    println!(
        "{}",
        format!("Planning {} release {}...", strategy.ecosystem(), version)
            .cyan()
            .bold()
    );

    println!(
        "\n{}",
        format!("1. Preparing {} entry for {}...", strategy.changelog_path(), version).yellow()
    );
    let changelog_entry = build_entry(&strategy, &local, &version, entry_source).await?;
    for line in changelog_entry.lines() {
        println!("   {}", line.dimmed());
    }

    println!("\n{}", "2. Planning file updates...".yellow());
    let updates = strategy.build_updates(&BuildUpdatesOptions {
        new_version: version,
        changelog_entry,
    });
    print_plan(&updates);

    if !apply {
        println!(
            "\n{}",
            "Dry run: pass --apply to write these changes".cyan()
        );
        return Ok(());
    }

    println!("\n{}", "3. Writing changes...".yellow());
    let report = apply_updates(&settings.root, &updates)?;
    print_apply_report(&report);

    println!(
        "\n{}",
        format!("✨ {} file(s) written", report.total_written())
            .green()
            .bold()
    );

    Ok(())
}

async fn build_entry(
    strategy: &Strategy,
    local: &LocalGitRepository,
    version: &Version,
    source: EntrySource,
) -> Result<String> {
    let subjects = match source {
        EntrySource::Text(text) => return Ok(text),
        EntrySource::File(path) => {
            return std::fs::read_to_string(&path).map_err(|e| {
                ReleaseError::Config(format!(
                    "Failed to read entry file '{}': {e}",
                    path.display()
                ))
            });
        }
        EntrySource::Commits(subjects) => subjects,
        EntrySource::GitRange(since) => local.commit_subjects(&format!("{since}..HEAD")).await?,
    };

    let commits: Vec<_> = subjects
        .iter()
        .filter_map(|subject| parse_conventional_commit(subject))
        .collect();

    if std::env::var(rrelease::VERBOSE_ENV).is_ok() {
        eprintln!(
            "[VERBOSE] {} of {} commit(s) follow conventional commits",
            commits.len(),
            subjects.len()
        );
    }

    let today = jiff::Zoned::now().date();
    Ok(render_entry(
        version,
        today,
        &commits,
        strategy.changelog_sections(),
    ))
}

fn print_plan(updates: &[Update]) {
    for (index, update) in updates.iter().enumerate() {
        let mode = if update.create_if_missing {
            "create if missing".green()
        } else {
            "must exist".red()
        };
        println!(
            "   {}. {} ({}) [{}]",
            index + 1,
            update.path.bright_cyan(),
            mode,
            update.updater.name().dimmed()
        );
    }
}

fn print_apply_report(report: &ApplyReport) {
    for (path, outcome) in &report.files {
        match outcome {
            ApplyOutcome::Created => println!("   {}", format!("✓ created {path}").green()),
            ApplyOutcome::Updated => println!("   {}", format!("✓ updated {path}").green()),
            ApplyOutcome::Unchanged => println!("   {}", format!("= {path} unchanged").dimmed()),
            ApplyOutcome::Skipped => {
                println!("   {}", format!("⚠ {path} does not exist, skipped").red())
            }
        }
    }
}

/// Execute the name lookup workflow
pub async fn execute_name(
    settings: ResolvedSettings,
    github: Option<&str>,
    token: Option<String>,
    api_url: Option<&str>,
) -> Result<()> {
    let client = match github {
        Some(slug) => RepositoryFactory::create_github(slug, token, api_url)?,
        None => RepositoryFactory::create_local(&settings.root)?,
    };
    let branch = settings.options.target_branch.clone();
    let strategy = Strategy::new(settings.ecosystem, settings.options, client);

    match strategy.package_name().await? {
        Some(name) => println!("{name}"),
        None => eprintln!(
            "{}",
            format!("⚠ No package name declared on branch '{branch}' (DESCRIPTION missing or without a Package field)")
                .yellow()
        ),
    }

    Ok(())
}

/// Execute the initial version workflow
pub fn execute_initial_version(settings: ResolvedSettings) -> Result<()> {
    let client = RepositoryFactory::create_local(&settings.root)?;
    let strategy = Strategy::new(settings.ecosystem, settings.options, client);
    println!("{}", strategy.initial_release_version());
    Ok(())
}
