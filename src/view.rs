//! Record list view: fetch rows once per mount and render them
//!
//! A view starts in [`DisplayState::Loading`]. `mount` spawns exactly one
//! fetch; when it completes the state moves to `Ready` or `Failed` and never
//! changes again. Rendering is a pure function of the state.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::errors::FetchFailure;
use crate::models::{DisplayState, FetchResponse, Record};
use crate::source::RemoteDataSource;

/// Text shown while the fetch is in flight
pub const LOADING_TEXT: &str = "Loading...";
/// Heading shown above the record blocks
pub const HEADING: &str = "Supabase Data Example";

/// A view over the first `limit` rows of one table
pub struct RecordListView {
    source: Arc<dyn RemoteDataSource>,
    table: String,
    limit: usize,
    state: Arc<watch::Sender<DisplayState>>,
    mounted: bool,
}

impl RecordListView {
    pub fn new(source: Arc<dyn RemoteDataSource>, table: impl Into<String>, limit: usize) -> Self {
        let (state, _) = watch::channel(DisplayState::Loading);
        Self {
            source,
            table: table.into(),
            limit,
            state: Arc::new(state),
            mounted: false,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Start the one fetch this view will ever make.
    ///
    /// Must be called from within a tokio runtime. Later calls do nothing. The
    /// spawned task only holds a weak handle on the state, so a result that
    /// arrives after the view is dropped is discarded.
    pub fn mount(&mut self) {
        if self.mounted {
            debug!("View for {} already mounted; ignoring", self.table);
            return;
        }
        self.mounted = true;

        info!("Mounting view for {} (limit {})", self.table, self.limit);

        let source = Arc::clone(&self.source);
        let table = self.table.clone();
        let limit = self.limit;
        let state = Arc::downgrade(&self.state);

        tokio::spawn(async move {
            let next = settle(source.fetch_rows(&table, limit).await);

            let Some(state) = state.upgrade() else {
                debug!("View for {} unmounted before rows arrived; dropping result", table);
                return;
            };

            match &next {
                DisplayState::Failed { message } => warn!("Loading {} failed: {}", table, message),
                DisplayState::Ready { records } => info!("Loaded {} records from {}", records.len(), table),
                DisplayState::Loading => {}
            }

            state.send_if_modified(|current| {
                if current.is_loading() {
                    *current = next;
                    true
                } else {
                    false
                }
            });
        });
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> DisplayState {
        self.state.borrow().clone()
    }

    /// Wait until the state leaves `Loading`. Only returns once `mount` has been called.
    pub async fn settled(&self) -> DisplayState {
        let mut rx = self.state.subscribe();
        // The sender lives as long as `self`, so this only returns once settled
        let _ = rx.wait_for(|state| !state.is_loading()).await;
        self.snapshot()
    }

    /// Render the current state
    pub fn view(&self) -> Rendered {
        render(&self.state.borrow())
    }
}

/// Map the outcome of a fetch to the state it settles the view in.
///
/// A remote-reported error wins over any rows sent alongside it, and absent
/// rows count as an empty list.
pub fn settle(outcome: Result<FetchResponse, FetchFailure>) -> DisplayState {
    let failure = match outcome {
        Ok(FetchResponse { error: Some(error), .. }) => FetchFailure::Remote(error),
        Ok(FetchResponse { rows, error: None }) => {
            return DisplayState::Ready {
                records: rows.unwrap_or_default(),
            };
        }
        Err(failure) => failure,
    };

    DisplayState::Failed {
        message: failure.display_message(),
    }
}

/// Output of rendering one display state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Loading,
    Error(String),
    Records { heading: String, blocks: Vec<String> },
}

impl Rendered {
    pub fn heading(&self) -> Option<&str> {
        match self {
            Rendered::Records { heading, .. } => Some(heading),
            _ => None,
        }
    }

    pub fn blocks(&self) -> &[String] {
        match self {
            Rendered::Records { blocks, .. } => blocks,
            _ => &[],
        }
    }

    /// Plain-text form: heading, then each block separated by a blank line
    pub fn to_text(&self) -> String {
        match self {
            Rendered::Loading => LOADING_TEXT.to_string(),
            Rendered::Error(message) => format!("Error: {}", message),
            Rendered::Records { heading, blocks } => {
                let mut text = heading.clone();
                for block in blocks {
                    text.push_str("\n\n");
                    text.push_str(block);
                }
                text
            }
        }
    }
}

/// Render a display state
pub fn render(state: &DisplayState) -> Rendered {
    match state {
        DisplayState::Loading => Rendered::Loading,
        DisplayState::Failed { message } => Rendered::Error(message.clone()),
        DisplayState::Ready { records } => Rendered::Records {
            heading: HEADING.to_string(),
            blocks: records.iter().map(format_record).collect(),
        },
    }
}

/// Pretty-print one record with two-space indentation
pub fn format_record(record: &Record) -> String {
    serde_json::to_string_pretty(record)
        .unwrap_or_else(|e| format!("<unprintable record: {}>", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorInfo;
    use crate::source::StaticSource;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    /// Source that blocks until released, counting calls
    struct GatedSource {
        gate: Notify,
        calls: AtomicUsize,
        response: FetchResponse,
    }

    impl GatedSource {
        fn new(response: FetchResponse) -> Arc<Self> {
            Arc::new(Self {
                gate: Notify::new(),
                calls: AtomicUsize::new(0),
                response,
            })
        }
    }

    #[async_trait]
    impl RemoteDataSource for GatedSource {
        async fn fetch_rows(&self, _table: &str, _limit: usize) -> Result<FetchResponse, FetchFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            Ok(self.response.clone())
        }

        fn describe(&self) -> String {
            "gated".to_string()
        }
    }

    async fn settle_with(source: StaticSource) -> Rendered {
        let mut view = RecordListView::new(Arc::new(source), "your_table", 10);
        view.mount();
        render(&view.settled().await)
    }

    #[tokio::test]
    async fn test_loading_before_fetch_resolves() {
        let source = GatedSource::new(FetchResponse::default());
        let mut view = RecordListView::new(source.clone(), "your_table", 10);
        view.mount();

        assert_eq!(view.view(), Rendered::Loading);
        assert_eq!(view.view().to_text(), "Loading...");
        assert!(view.view().blocks().is_empty());

        source.gate.notify_one();
        assert!(matches!(view.settled().await, DisplayState::Ready { .. }));
    }

    #[tokio::test]
    async fn test_rows_render_in_order() {
        let rows = vec![record(json!({"a": 1})), record(json!({"a": 2}))];
        let rendered = settle_with(StaticSource::with_rows(rows)).await;

        assert_eq!(rendered.heading(), Some(HEADING));
        assert_eq!(rendered.blocks(), &["{\n  \"a\": 1\n}".to_string(), "{\n  \"a\": 2\n}".to_string()]);
        assert_eq!(
            rendered.to_text(),
            "Supabase Data Example\n\n{\n  \"a\": 1\n}\n\n{\n  \"a\": 2\n}"
        );
    }

    #[tokio::test]
    async fn test_null_rows_render_empty_list() {
        let rendered = settle_with(StaticSource::new(FetchResponse::default())).await;

        assert_eq!(rendered.heading(), Some(HEADING));
        assert!(rendered.blocks().is_empty());
        assert_eq!(rendered.to_text(), HEADING);
    }

    #[tokio::test]
    async fn test_remote_error_wins_over_rows() {
        let response = FetchResponse {
            rows: Some(vec![record(json!({"a": 1}))]),
            error: Some(ErrorInfo::with_message("permission denied")),
        };
        let rendered = settle_with(StaticSource::new(response)).await;

        assert_eq!(rendered.to_text(), "Error: permission denied");
        assert!(rendered.blocks().is_empty());
    }

    #[tokio::test]
    async fn test_rejection_without_message_uses_fallback() {
        let rendered = settle_with(StaticSource::rejecting(ErrorInfo::default())).await;
        assert_eq!(rendered.to_text(), "Error: An error occurred");
    }

    #[tokio::test]
    async fn test_mount_fetches_once() {
        let source = Arc::new(StaticSource::with_rows(vec![]));
        let mut view = RecordListView::new(source.clone(), "your_table", 10);

        view.mount();
        view.mount();
        view.settled().await;
        view.mount();

        tokio::task::yield_now().await;
        assert_eq!(source.calls(), 1);
        assert!(view.is_mounted());
    }

    #[tokio::test]
    async fn test_state_does_not_change_after_settling() {
        let source = Arc::new(StaticSource::with_rows(vec![record(json!({"id": 7}))]));
        let mut view = RecordListView::new(source, "your_table", 10);
        view.mount();

        let first = view.settled().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(view.snapshot(), first);
    }

    #[tokio::test]
    async fn test_late_result_after_unmount_is_inert() {
        let source = GatedSource::new(FetchResponse::rows(vec![record(json!({"a": 1}))]));
        let mut view = RecordListView::new(source.clone(), "your_table", 10);
        view.mount();

        // Observe the shared value after the sender is gone
        let mut rx = view.state.subscribe();
        let handle = Arc::downgrade(&view.state);

        // Let the task start its fetch, then unmount
        tokio::task::yield_now().await;
        drop(view);
        assert!(handle.upgrade().is_none());

        source.gate.notify_one();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        assert!(rx.borrow().is_loading());
        assert!(rx.has_changed().is_err());
        assert!(handle.upgrade().is_none());
    }

    #[test]
    fn test_render_is_pure() {
        let state = DisplayState::Ready {
            records: vec![record(json!({"name": "Ada", "tags": ["x", "y"], "meta": null}))],
        };
        assert_eq!(render(&state), render(&state));

        let failed = DisplayState::Failed { message: "boom".to_string() };
        assert_eq!(render(&failed).to_text(), render(&failed).to_text());
    }

    #[test]
    fn test_format_record_keeps_key_order() {
        let record: Record = serde_json::from_str(r#"{"z": true, "a": {"nested": [1, 2]}}"#).unwrap();
        assert_eq!(
            format_record(&record),
            "{\n  \"z\": true,\n  \"a\": {\n    \"nested\": [\n      1,\n      2\n    ]\n  }\n}"
        );
    }

    #[test]
    fn test_settle_outcomes() {
        assert_eq!(
            settle(Ok(FetchResponse::default())),
            DisplayState::Ready { records: vec![] }
        );
        assert_eq!(
            settle(Err(FetchFailure::InvalidTable("a b".to_string()))),
            DisplayState::Failed { message: "Invalid table name: 'a b'".to_string() }
        );
        assert_eq!(
            settle(Ok(FetchResponse::error(ErrorInfo::with_message("  ")))),
            DisplayState::Failed { message: "An error occurred".to_string() }
        );
        assert_eq!(
            settle(Ok(FetchResponse::error(ErrorInfo::with_message("")))),
            DisplayState::Failed { message: "An error occurred".to_string() }
        );
    }

    #[test]
    fn test_error_message_shown_verbatim() {
        let state = settle(Ok(FetchResponse::error(ErrorInfo::with_message("  permission denied\n"))));
        assert_eq!(render(&state).to_text(), "Error:   permission denied\n");
    }
}
