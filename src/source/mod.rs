//! Remote data sources that can supply rows to a record list view
//!
//! The view only ever needs one capability from a source: fetch up to `limit`
//! rows of a named table. `PostgrestSource` does that against a Supabase REST
//! endpoint, `StaticSource` serves a canned response for offline use.

pub mod fixture;
pub mod postgrest;

use async_trait::async_trait;

use crate::errors::FetchFailure;
use crate::models::FetchResponse;

pub use fixture::StaticSource;
pub use postgrest::PostgrestSource;

/// A queryable store of table rows
#[async_trait]
pub trait RemoteDataSource: Send + Sync {
    /// Fetch at most `limit` rows from `table`.
    ///
    /// A remote-reported problem comes back as `Ok` with `error` set; transport
    /// and decoding problems come back as `Err`.
    async fn fetch_rows(&self, table: &str, limit: usize) -> Result<FetchResponse, FetchFailure>;

    /// Short label used in logs and the status bar
    fn describe(&self) -> String;
}

/// Check that a table name is safe to place in a request path
pub fn validate_table_name(table: &str) -> Result<(), FetchFailure> {
    let valid = !table.is_empty()
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));

    if valid {
        Ok(())
    } else {
        Err(FetchFailure::InvalidTable(table.to_string()))
    }
}
