use crate::error::{ReleaseError, Result};
use std::path::{Component, Path, PathBuf};

/// Provides safe path validation helpers to avoid traversal and host intrusion.
pub struct PathValidator;

impl PathValidator {
    /// Validates and canonicalises an incoming repository path.
    pub fn validate_project_path(path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();

        let canonical = path.canonicalize().map_err(|e| {
            ReleaseError::ProjectValidation(format!("Invalid path '{}': {e}", path.display()))
        })?;

        if !canonical.is_dir() {
            return Err(ReleaseError::ProjectValidation(format!(
                "Path '{}' is not a directory",
                canonical.display()
            )));
        }

        const FORBIDDEN: &[&str] = &["/etc", "/sys", "/proc", "/dev", "/boot"];

        for forbidden in FORBIDDEN {
            let forbidden_path = Path::new(forbidden);

            if path.starts_with(forbidden_path) || canonical.starts_with(forbidden_path) {
                return Err(ReleaseError::ProjectValidation(format!(
                    "Access to system directory '{}' is not allowed",
                    forbidden
                )));
            }
        }

        Ok(canonical)
    }

    /// Joins a repository-relative `relative` path onto `base_dir`, refusing
    /// anything that would land outside it. The file itself may not exist yet.
    pub fn resolve_within(base_dir: impl AsRef<Path>, relative: &str) -> Result<PathBuf> {
        let base_dir = base_dir.as_ref();
        let relative_path = Path::new(relative);

        if relative.is_empty()
            || relative_path
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(ReleaseError::ProjectValidation(format!(
                "Path '{relative}' must stay inside the repository"
            )));
        }

        let canonical_base = base_dir.canonicalize().map_err(|e| {
            ReleaseError::ProjectValidation(format!(
                "Invalid base directory '{}': {e}",
                base_dir.display()
            ))
        })?;

        let candidate = canonical_base.join(relative_path);

        // Symlinked parents could still point elsewhere
        let mut existing = candidate.as_path();
        while !existing.exists() {
            existing = match existing.parent() {
                Some(parent) => parent,
                None => break,
            };
        }
        let canonical_existing = existing.canonicalize().map_err(|e| {
            ReleaseError::ProjectValidation(format!("Invalid path '{}': {e}", existing.display()))
        })?;

        if !canonical_existing.starts_with(&canonical_base) {
            return Err(ReleaseError::ProjectValidation(
                "File path is outside the allowed directory".to_string(),
            ));
        }

        Ok(candidate)
    }
}
