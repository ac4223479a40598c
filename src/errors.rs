//! Error types for fetching rows from the remote data source

use thiserror::Error;

use crate::models::ErrorInfo;

/// Text shown when a failure carries no message of its own
pub const FALLBACK_MESSAGE: &str = "An error occurred";

#[derive(Error, Debug)]
pub enum FetchFailure {
    #[error("{}", .0.message().unwrap_or(FALLBACK_MESSAGE))]
    Remote(ErrorInfo),

    #[error("Invalid table name: '{0}'")]
    InvalidTable(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchFailure {
    /// Human-readable message, `None` when the failure has nothing to say
    pub fn message(&self) -> Option<String> {
        match self {
            FetchFailure::Remote(info) => info.message().map(str::to_string),
            other => Some(other.to_string()),
        }
    }

    /// Message as shown to the user, with the fixed fallback applied
    pub fn display_message(&self) -> String {
        self.message()
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
    }
}

impl From<ErrorInfo> for FetchFailure {
    fn from(info: ErrorInfo) -> Self {
        FetchFailure::Remote(info)
    }
}
