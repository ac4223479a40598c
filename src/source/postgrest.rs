//! Supabase / PostgREST row source

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use super::{validate_table_name, RemoteDataSource};
use crate::config::Config;
use crate::errors::FetchFailure;
use crate::models::{ErrorInfo, FetchResponse, Record};

/// Reads rows through the `/rest/v1` endpoint of a Supabase project
pub struct PostgrestSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PostgrestSource {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Build a source from validated configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        config.validate_remote()?;

        let client = Client::builder()
            .user_agent(config.http.user_agent.clone())
            .timeout(config.http_timeout())
            .build()?;

        // validate_remote guarantees both are present
        let base_url = config.supabase_url.clone().unwrap_or_default();
        let api_key = config.api_key.clone().unwrap_or_default();

        Ok(Self::new(client, base_url, api_key))
    }

    /// URL of the table endpoint, without query parameters
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }
}

#[async_trait]
impl RemoteDataSource for PostgrestSource {
    async fn fetch_rows(&self, table: &str, limit: usize) -> Result<FetchResponse, FetchFailure> {
        validate_table_name(table)?;

        let url = self.table_url(table);
        debug!("GET {} (limit {})", url, limit);

        let response = self
            .client
            .get(&url)
            .query(&[("select", "*".to_string()), ("limit", limit.to_string())])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let parsed = parse_response(status, &body)?;
        match &parsed.error {
            Some(error) => warn!("Table {} returned status {}: {:?}", table, status, error),
            None => info!(
                "Fetched {} rows from {}",
                parsed.rows.as_ref().map(Vec::len).unwrap_or(0),
                table
            ),
        }

        Ok(parsed)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Turn an HTTP status and body into a fetch response.
///
/// Success bodies must be a JSON array (or `null`); anything else is a decode
/// failure. Error bodies are read as PostgREST errors when they look like one.
pub fn parse_response(status: StatusCode, body: &str) -> Result<FetchResponse, FetchFailure> {
    let trimmed = body.trim();

    if status.is_success() {
        if trimmed.is_empty() {
            return Ok(FetchResponse::default());
        }
        let rows: Option<Vec<Record>> = serde_json::from_str(trimmed)?;
        return Ok(FetchResponse { rows, error: None });
    }

    let error = match serde_json::from_str::<ErrorInfo>(trimmed) {
        Ok(info) if info.message().is_some() || info.code.is_some() => info,
        _ if trimmed.is_empty() => ErrorInfo::with_message(format!("HTTP {}", status.as_u16())),
        _ => ErrorInfo::with_message(format!("HTTP {}: {}", status.as_u16(), trimmed)),
    };

    Ok(FetchResponse::error(error))
}
