use crate::error::Result;
use async_trait::async_trait;

pub mod factory;
pub mod github;
pub mod local;

pub use factory::RepositoryFactory;
pub use github::GitHubRepository;
pub use local::LocalGitRepository;

/// A file read from a branch of the source repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContents {
    /// Blob SHA of the file on the branch.
    pub sha: String,
    /// Raw content as returned by the backend (base64 for GitHub).
    pub content: String,
    /// Decoded UTF-8 text.
    pub parsed_content: String,
}

/// Read access to files on a branch.
///
/// Implementations report a missing path as `ReleaseError::FileNotFound` so
/// callers can tell absence apart from transport or permission failures.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    async fn file_contents_on_branch(&self, path: &str, branch: &str) -> Result<FileContents>;
}
