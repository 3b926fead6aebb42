use crate::error::{ReleaseError, Result};
use crate::repository::{FileContents, RepositoryClient};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Reads files through the GitHub repository contents API.
pub struct GitHubRepository {
    client: Client,
    api_url: Url,
    owner: String,
    repo: String,
    token: Option<String>,
}

impl GitHubRepository {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: Option<String>,
        api_url: Option<&str>,
    ) -> Result<Self> {
        let api_url = Self::validate_api_url(api_url.unwrap_or(DEFAULT_API_URL))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("rrelease/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_url,
            owner: owner.into(),
            repo: repo.into(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Builds a client from an `owner/repo` slug.
    pub fn from_slug(slug: &str, token: Option<String>, api_url: Option<&str>) -> Result<Self> {
        match slug.trim().split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Self::new(owner, repo, token, api_url)
            }
            _ => Err(ReleaseError::ProjectValidation(format!(
                "Invalid GitHub repository '{slug}', expected OWNER/REPO"
            ))),
        }
    }

    fn contents_url(&self, path: &str, branch: &str) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ReleaseError::ProjectValidation(format!("Invalid API URL: {}", self.api_url))
            })?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.repo.as_str(), "contents"])
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        url.query_pairs_mut().append_pair("ref", branch);
        Ok(url)
    }

    async fn get(&self, url: &Url, accept: &str) -> Result<reqwest::Response> {
        let mut request = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, accept)
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        if std::env::var(crate::VERBOSE_ENV).is_ok() {
            eprintln!("[VERBOSE] Fetching: {url}");
        }

        Ok(request.send().await?)
    }

    fn check_status(response: &reqwest::Response, path: &str, branch: &str) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        if std::env::var(crate::VERBOSE_ENV).is_ok() {
            eprintln!("[VERBOSE] HTTP {}: {}", status, response.url());
        }

        match status {
            StatusCode::NOT_FOUND => Err(ReleaseError::FileNotFound {
                path: path.to_string(),
                branch: branch.to_string(),
            }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ReleaseError::Unauthorized(
                format!("HTTP {} reading {path} on {branch}", status.as_u16()),
            )),
            _ => Err(ReleaseError::Http {
                status: status.as_u16(),
                url: response.url().to_string(),
            }),
        }
    }

    fn decode_content(encoded: &str) -> Result<String> {
        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD
            .decode(compact)
            .map_err(|e| ReleaseError::Decode(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ReleaseError::Decode(e.to_string()))
    }

    fn validate_api_url(url: &str) -> Result<Url> {
        let parsed = Url::parse(url)
            .map_err(|_| ReleaseError::ProjectValidation(format!("Invalid API URL: {url}")))?;

        match parsed.scheme() {
            "https" | "http" => {}
            scheme => {
                return Err(ReleaseError::ProjectValidation(format!(
                    "Unsupported API scheme: {scheme}"
                )));
            }
        }

        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(ReleaseError::ProjectValidation(format!(
                "API URL '{url}' has no host"
            )));
        }

        Ok(parsed)
    }
}

#[async_trait]
impl RepositoryClient for GitHubRepository {
    async fn file_contents_on_branch(&self, path: &str, branch: &str) -> Result<FileContents> {
        let url = self.contents_url(path, branch)?;
        let response = self.get(&url, "application/vnd.github+json").await?;
        Self::check_status(&response, path, branch)?;

        let body: ContentsResponse = serde_json::from_str(&response.text().await?)?;

        // Files over 1MB come back without inline content
        let parsed_content = if body.encoding.as_deref() == Some("base64") {
            Self::decode_content(&body.content)?
        } else {
            let raw = self.get(&url, "application/vnd.github.raw").await?;
            Self::check_status(&raw, path, branch)?;
            raw.text().await?
        };

        Ok(FileContents {
            sha: body.sha,
            content: body.content,
            parsed_content,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}
