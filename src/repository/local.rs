use crate::error::{ReleaseError, Result};
use crate::repository::{FileContents, RepositoryClient};
use crate::utils::path_validator::PathValidator;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;

/// Reads committed files from a local clone with the system `git`.
///
/// Only committed blobs are visible; the working tree is never consulted.
pub struct LocalGitRepository {
    repo_path: PathBuf,
}

impl LocalGitRepository {
    pub fn new<P: AsRef<Path>>(repo_path: P) -> Result<Self> {
        let repo_path = Self::validate_git_path(repo_path.as_ref())?;
        Ok(Self { repo_path })
    }

    async fn run_git(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .current_dir(&self.repo_path)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                ReleaseError::GitOperation(format!(
                    "Failed to execute git command '{}': {e}",
                    args.join(" ")
                ))
            })
    }

    /// Resolves `rev` to an object id, `None` when it does not resolve.
    async fn resolve(&self, rev: &str) -> Result<Option<String>> {
        let output = self.run_git(&["rev-parse", "--verify", "--quiet", rev]).await?;
        if output.status.success() {
            Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()))
        } else if output.status.code() == Some(1) {
            Ok(None)
        } else {
            Err(Self::failure(&output, "git rev-parse"))
        }
    }

    /// Commit subjects in `range` (e.g. `v1.0.0..HEAD`), newest first, merges excluded.
    pub async fn commit_subjects(&self, range: &str) -> Result<Vec<String>> {
        Self::validate_revision(range)?;
        let output = self
            .run_git(&["log", "--no-merges", "--format=%s", range])
            .await?;
        if !output.status.success() {
            return Err(Self::failure(&output, "git log"));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect())
    }

    fn failure(output: &Output, command: &str) -> ReleaseError {
        ReleaseError::GitOperation(format!(
            "{} failed: {}",
            command,
            String::from_utf8_lossy(&output.stderr).trim()
        ))
    }

    fn validate_revision(revision: &str) -> Result<()> {
        if revision.is_empty()
            || revision.starts_with('-')
            || revision.chars().any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(ReleaseError::GitOperation(format!(
                "Refusing unsafe revision '{revision}'"
            )));
        }
        Ok(())
    }

    fn validate_file_path(path: &str) -> Result<()> {
        if path.is_empty() || path.starts_with('/') || path.split('/').any(|part| part == "..") {
            return Err(ReleaseError::GitOperation(format!(
                "Refusing unsafe repository path '{path}'"
            )));
        }
        Ok(())
    }

    fn validate_git_path(path: &Path) -> Result<PathBuf> {
        let dangerous = [';', '|', '&', '$', '`', '\n', '\r'];
        let path_str = path.to_string_lossy();
        if let Some(ch) = dangerous.iter().find(|c| path_str.contains(**c)) {
            return Err(ReleaseError::GitOperation(format!(
                "Path contains dangerous character: '{}'",
                ch
            )));
        }

        PathValidator::validate_project_path(path)
            .map_err(|err| ReleaseError::GitOperation(format!("Invalid Git path: {}", err)))
    }
}

#[async_trait]
impl RepositoryClient for LocalGitRepository {
    async fn file_contents_on_branch(&self, path: &str, branch: &str) -> Result<FileContents> {
        Self::validate_revision(branch)?;
        Self::validate_file_path(path)?;

        if self.resolve(&format!("{branch}^{{commit}}")).await?.is_none() {
            return Err(ReleaseError::GitOperation(format!(
                "Branch '{branch}' does not exist"
            )));
        }

        let Some(sha) = self.resolve(&format!("{branch}:{path}")).await? else {
            if std::env::var(crate::VERBOSE_ENV).is_ok() {
                eprintln!("[VERBOSE] {path} is not committed on {branch}");
            }
            return Err(ReleaseError::FileNotFound {
                path: path.to_string(),
                branch: branch.to_string(),
            });
        };

        let output = self.run_git(&["cat-file", "blob", &sha]).await?;
        if !output.status.success() {
            return Err(Self::failure(&output, "git cat-file"));
        }

        let parsed_content = String::from_utf8(output.stdout)
            .map_err(|e| ReleaseError::Decode(format!("{path} is not UTF-8: {e}")))?;

        Ok(FileContents {
            sha,
            content: parsed_content.clone(),
            parsed_content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::process::Command as StdCommand;
    use tempfile::tempdir;

    fn git(dir: &Path, args: &[&str]) -> bool {
        StdCommand::new("git")
            .current_dir(dir)
            .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
            .args(args)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[test]
    fn rejects_dangerous_paths() {
        let dir = tempdir().unwrap();
        let dangerous = dir.path().join("sub;dir");
        fs::create_dir_all(&dangerous).unwrap();
        assert!(LocalGitRepository::new(dangerous).is_err());
    }

    #[test]
    fn rejects_option_like_revisions() {
        assert!(LocalGitRepository::validate_revision("--output=x").is_err());
        assert!(LocalGitRepository::validate_revision("main branch").is_err());
        assert!(LocalGitRepository::validate_revision("release/1.x").is_ok());
    }

    #[test]
    fn rejects_traversal_in_file_path() {
        assert!(LocalGitRepository::validate_file_path("../DESCRIPTION").is_err());
        assert!(LocalGitRepository::validate_file_path("/etc/passwd").is_err());
        assert!(LocalGitRepository::validate_file_path("pkg/DESCRIPTION").is_ok());
    }

    #[tokio::test]
    async fn reads_committed_file_and_reports_missing_ones() {
        let dir = tempdir().unwrap();
        if !git(dir.path(), &["init", "-q"]) {
            // no git binary
            return;
        }
        fs::write(dir.path().join("DESCRIPTION"), "Package: libfoo\n").unwrap();
        if !git(dir.path(), &["add", "DESCRIPTION"])
            || !git(dir.path(), &["commit", "-q", "--no-gpg-sign", "-m", "init"])
        {
            return;
        }

        let repo = LocalGitRepository::new(dir.path()).unwrap();
        let file = repo
            .file_contents_on_branch("DESCRIPTION", "HEAD")
            .await
            .unwrap();
        assert_eq!(file.parsed_content, "Package: libfoo\n");

        let err = repo
            .file_contents_on_branch("NEWS.md", "HEAD")
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = repo
            .file_contents_on_branch("DESCRIPTION", "no-such-branch")
            .await
            .unwrap_err();
        assert!(matches!(err, ReleaseError::GitOperation(_)));
    }
}
