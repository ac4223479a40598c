use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row returned by the remote table. Keys keep the order the server sent them in.
pub type Record = Map<String, Value>;

/// Error body reported by the remote data source (PostgREST shape)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl ErrorInfo {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Message text exactly as sent, or `None` when it is absent or blank
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
    }
}

/// Result of a single `fetch_rows` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchResponse {
    #[serde(default)]
    pub rows: Option<Vec<Record>>,
    #[serde(default)]
    pub error: Option<ErrorInfo>,
}

impl FetchResponse {
    pub fn rows(rows: Vec<Record>) -> Self {
        Self {
            rows: Some(rows),
            error: None,
        }
    }

    pub fn error(error: ErrorInfo) -> Self {
        Self {
            rows: None,
            error: Some(error),
        }
    }
}

/// Rendering mode of a record list view
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DisplayState {
    #[default]
    Loading,
    Failed { message: String },
    Ready { records: Vec<Record> },
}

impl DisplayState {
    pub fn is_loading(&self) -> bool {
        matches!(self, DisplayState::Loading)
    }

    pub fn as_str(&self) -> &str {
        match self {
            DisplayState::Loading => "loading",
            DisplayState::Failed { .. } => "failed",
            DisplayState::Ready { .. } => "ready",
        }
    }
}
