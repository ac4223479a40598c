//! Centralized configuration management for rowview

use std::time::Duration;
use anyhow::{Result, Context};

/// Default table queried when nothing else is configured
pub const DEFAULT_TABLE: &str = "your_table";
/// Default number of rows fetched per mount
pub const DEFAULT_LIMIT: usize = 10;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Supabase project URL, e.g. `https://xyz.supabase.co`
    pub supabase_url: Option<String>,
    /// API key sent as both `apikey` and bearer token
    pub api_key: Option<String>,
    /// Table to read rows from
    pub table: String,
    /// Maximum number of rows to fetch
    pub limit: usize,
    /// HTTP client configuration
    pub http: HttpConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: "rowview/0.1.0".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            supabase_url: None,
            api_key: None,
            table: DEFAULT_TABLE.to_string(),
            limit: DEFAULT_LIMIT,
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let supabase_url = lookup("SUPABASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        // Browser-style anon key first, service key as fallback
        let api_key = lookup("SUPABASE_ANON_KEY")
            .filter(|key| !key.is_empty())
            .or_else(|| lookup("SUPABASE_SERVICE_KEY").filter(|key| !key.is_empty()));

        let table = lookup("ROWVIEW_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string());

        let limit = parse_var(&lookup, "ROWVIEW_LIMIT")?.unwrap_or(DEFAULT_LIMIT);

        let http = HttpConfig {
            timeout_seconds: parse_var(&lookup, "ROWVIEW_HTTP_TIMEOUT_SECONDS")?.unwrap_or(30),
            user_agent: lookup("ROWVIEW_USER_AGENT")
                .unwrap_or_else(|| "rowview/0.1.0".to_string()),
        };

        Ok(Config {
            supabase_url,
            api_key,
            table,
            limit,
            http,
        })
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Validate settings shared by every mode
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(anyhow::anyhow!("Row limit must be greater than zero"));
        }
        if self.table.trim().is_empty() {
            return Err(anyhow::anyhow!("Table name must not be empty"));
        }
        Ok(())
    }

    /// Validate settings required to talk to the remote API
    pub fn validate_remote(&self) -> Result<()> {
        self.validate()?;

        let url = self
            .supabase_url
            .as_deref()
            .context("SUPABASE_URL is not set")?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "SUPABASE_URL must start with http:// or https://, got '{}'",
                url
            ));
        }

        if self.api_key.is_none() {
            return Err(anyhow::anyhow!(
                "Supabase API key not configured. Set SUPABASE_ANON_KEY or SUPABASE_SERVICE_KEY"
            ));
        }

        Ok(())
    }
}

/// Helper function to parse a variable as a specific type
fn parse_var<T, F>(lookup: &F, var_name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match lookup(var_name) {
        Some(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        None => Ok(None),
    }
}
