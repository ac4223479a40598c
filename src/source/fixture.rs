//! In-memory row source backed by a canned response

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::RemoteDataSource;
use crate::errors::FetchFailure;
use crate::models::{ErrorInfo, FetchResponse, Record};

/// Serves the same response to every request, optionally after a delay
pub struct StaticSource {
    outcome: std::result::Result<FetchResponse, ErrorInfo>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    label: String,
}

impl StaticSource {
    /// Resolve every fetch with `response`
    pub fn new(response: FetchResponse) -> Self {
        Self {
            outcome: Ok(response),
            delay: None,
            calls: AtomicUsize::new(0),
            label: "static".to_string(),
        }
    }

    /// Resolve every fetch with the given rows
    pub fn with_rows(rows: Vec<Record>) -> Self {
        Self::new(FetchResponse::rows(rows))
    }

    /// Reject every fetch, as a transport failure would
    pub fn rejecting(error: ErrorInfo) -> Self {
        Self {
            outcome: Err(error),
            ..Self::new(FetchResponse::default())
        }
    }

    /// Load a response from a JSON file shaped like `{"rows": [...], "error": null}`
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Cannot read fixture file: {}", path.display()))?;
        let response: FetchResponse = serde_json::from_str(&content)
            .with_context(|| format!("Invalid fixture file: {}", path.display()))?;

        let mut source = Self::new(response);
        source.label = path.display().to_string();
        Ok(source)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetches served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteDataSource for StaticSource {
    async fn fetch_rows(&self, table: &str, limit: usize) -> Result<FetchResponse, FetchFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        debug!("Serving {} (limit {}) from {}", table, limit, self.label);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.outcome {
            Ok(response) => {
                let mut response = response.clone();
                if let Some(rows) = response.rows.as_mut() {
                    rows.truncate(limit);
                }
                Ok(response)
            }
            Err(error) => Err(FetchFailure::Remote(error.clone())),
        }
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
