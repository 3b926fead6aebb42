mod cli;
mod workflow;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;
use workflow::{EntrySource, Overrides};

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        // Set before the runtime starts any worker threads
        unsafe {
            std::env::set_var(rrelease::VERBOSE_ENV, "1");
        }
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(cli)) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> rrelease::Result<()> {
    let settings = workflow::resolve_settings(
        &cli.path,
        Overrides {
            config: cli.config.as_deref(),
            package_path: cli.package_path.as_deref(),
            changelog_path: cli.changelog_path.as_deref(),
            target_branch: cli.target_branch.as_deref(),
            ecosystem: cli.ecosystem,
        },
    )?;

    match cli.command {
        Commands::Plan {
            release_version,
            entry,
            entry_file,
            commits,
            since,
            apply,
        } => {
            let source = match (entry, entry_file, since) {
                (Some(text), _, _) => EntrySource::Text(text),
                (None, Some(path), _) => EntrySource::File(path),
                (None, None, Some(since)) => EntrySource::GitRange(since),
                (None, None, None) => EntrySource::Commits(commits),
            };
            workflow::execute_plan(settings, &release_version, source, apply).await
        }
        Commands::Name {
            github,
            token,
            api_url,
        } => workflow::execute_name(settings, github.as_deref(), token, api_url.as_deref()).await,
        Commands::InitialVersion => workflow::execute_initial_version(settings),
    }
}
