use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("File '{path}' not found on branch '{branch}'")]
    FileNotFound { path: String, branch: String },

    #[error("Repository access denied: {0}")]
    Unauthorized(String),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Git operation failed: {0}")]
    GitOperation(String),

    #[error("Project validation failed: {0}")]
    ProjectValidation(String),

    #[error("Manifest update failed: {0}")]
    Manifest(String),

    #[error("Invalid version: {0}")]
    InvalidVersion(#[from] semver::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to decode file contents: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReleaseError {
    /// True when the error only signals that a file is absent on the branch.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReleaseError::FileNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, ReleaseError>;
