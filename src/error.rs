//! Error types for the signal relay

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Source error: {0}")]
    Source(String),

    #[error("Sink error: {0}")]
    Sink(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Whether the error is a run-level precondition failure.
    ///
    /// Everything else is scoped to a single message, delivery or
    /// persistence attempt and must not abort the batch.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RelayError::Config(_))
    }
}

impl From<config::ConfigError> for RelayError {
    fn from(err: config::ConfigError) -> Self {
        RelayError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
