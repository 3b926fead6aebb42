use crate::error::{ReleaseError, Result};
use crate::update::Update;
use crate::utils::PathValidator;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// What happened to one file while applying a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Created,
    Updated,
    Unchanged,
    /// Missing file whose update may not create it.
    Skipped,
}

/// Tracks the files touched while applying a release plan
#[derive(Debug, Clone, Default)]
pub struct ApplyReport {
    pub files: Vec<(String, ApplyOutcome)>,
}

impl ApplyReport {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    pub fn record(&mut self, path: impl Into<String>, outcome: ApplyOutcome) {
        self.files.push((path.into(), outcome));
    }

    pub fn outcome(&self, path: &str) -> Option<ApplyOutcome> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, outcome)| *outcome)
    }

    /// Number of files written to disk
    pub fn total_written(&self) -> usize {
        self.files
            .iter()
            .filter(|(_, o)| matches!(o, ApplyOutcome::Created | ApplyOutcome::Updated))
            .count()
    }
}

/// Applies `updates` in order to the working tree rooted at `root`.
///
/// Every updater runs before anything is written, so a failing update leaves
/// the tree untouched.
pub fn apply_updates(root: &Path, updates: &[Update]) -> Result<ApplyReport> {
    let mut report = ApplyReport::new();
    let mut pending = Vec::new();

    for update in updates {
        let target = PathValidator::resolve_within(root, &update.path)?;

        let existing = match fs::read_to_string(&target) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                return Err(ReleaseError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to read {}: {e}", update.path),
                )));
            }
        };

        if existing.is_none() && !update.create_if_missing {
            if std::env::var(crate::VERBOSE_ENV).is_ok() {
                eprintln!("[VERBOSE] {} does not exist, skipping", update.path);
            }
            report.record(&update.path, ApplyOutcome::Skipped);
            continue;
        }

        let updated = update.updater.update_content(existing.as_deref())?;

        let outcome = match existing.as_deref() {
            None => ApplyOutcome::Created,
            Some(previous) if previous == updated => ApplyOutcome::Unchanged,
            Some(_) => ApplyOutcome::Updated,
        };

        if outcome != ApplyOutcome::Unchanged {
            pending.push((target, updated));
        }
        report.record(&update.path, outcome);
    }

    for (target, content) in pending {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, content)?;
    }

    Ok(report)
}
