use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwesomeStarsError {
    #[error("GitHub API error: {0}")]
    ApiError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Invalid repository URL: {0}")]
    InvalidRepoUrl(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Malformed document at line {line}: {reason}")]
    MalformedDocument { line: usize, reason: String },
}

impl AwesomeStarsError {
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        AwesomeStarsError::MalformedDocument { line, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, AwesomeStarsError>;
