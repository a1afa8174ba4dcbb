use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommitLensError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API request failed: {status} - {message}")]
    Api { status: StatusCode, message: String },

    #[error("AI service error: {0}")]
    AiService(String),

    #[error("AI quota exhausted: {0}")]
    AiQuota(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CommitLensError>;
