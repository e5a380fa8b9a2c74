//! Error types for the yt-comment-threads CLI tool.

use thiserror::Error;

/// Errors raised by a comment-thread service (the remote API or its transport).
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("YouTube API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("YouTube server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Failed to parse API response: {0}")]
    Parse(String),

    #[error("No credentials configured. Set YOUTUBE_API_KEY or YOUTUBE_ACCESS_TOKEN")]
    MissingCredentials,
}

/// Errors raised while rendering results.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to serialize YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by the comment-thread client operations.
#[derive(Error, Debug)]
pub enum CommentThreadError {
    #[error("failed to get comment thread: {0}")]
    Get(#[source] ServiceError),

    #[error("failed to insert comment thread: {0}")]
    Insert(#[source] ServiceError),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Failed to initialize YouTube service: {0}")]
    Service(#[source] ServiceError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

impl CommentThreadError {
    /// Returns the underlying service error for `Get`/`Insert` failures.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Self::Get(e) | Self::Insert(e) | Self::Service(e) => Some(e),
            _ => None,
        }
    }
}
