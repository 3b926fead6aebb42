use crate::error::Result;
use crate::repository::{GitHubRepository, LocalGitRepository, RepositoryClient};
use std::path::Path;
use std::sync::Arc;

pub struct RepositoryFactory;

impl RepositoryFactory {
    pub fn create_github(
        slug: &str,
        token: Option<String>,
        api_url: Option<&str>,
    ) -> Result<Arc<dyn RepositoryClient>> {
        let client = GitHubRepository::from_slug(slug, token, api_url)?;
        Ok(Arc::new(client))
    }

    pub fn create_local<P: AsRef<Path>>(path: P) -> Result<Arc<dyn RepositoryClient>> {
        let client = LocalGitRepository::new(path)?;
        Ok(Arc::new(client))
    }
}
