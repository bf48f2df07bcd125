//! Error types for the analytics pipeline

use thiserror::Error;

/// Errors produced while fetching and assembling metric data.
///
/// `Clone` because a single in-flight fetch hands its outcome to every
/// caller that joined it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid date range: {0}")]
    InvalidDate(String),

    #[error("Fetch task aborted: {0}")]
    Aborted(String),

    #[error("Lock poisoned")]
    LockPoisoned,
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::InvalidResponse(err.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}

// Serialized as a plain message for the dashboard's "data unavailable" state
impl serde::Serialize for FetchError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
