//! Record viewer application state and event loop

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    text::Span,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::info;

use super::ui::{content_lines, Styles};
use crate::models::DisplayState;
use crate::view::{RecordListView, Rendered};

/// How long to wait for input before redrawing
const TICK: Duration = Duration::from_millis(100);

/// Main TUI application state
pub struct App {
    /// The one view this application shows
    pub view: RecordListView,
    /// Where rows come from, for the status bar
    pub source_label: String,
    /// Vertical scroll position of the content paragraph
    pub scroll_offset: u16,
    /// When the view settled, if it has
    pub loaded_at: Option<chrono::DateTime<chrono::Local>>,
    pub should_quit: bool,
}

impl App {
    pub fn new(view: RecordListView, source_label: impl Into<String>) -> Self {
        Self {
            view,
            source_label: source_label.into(),
            scroll_offset: 0,
            loaded_at: None,
            should_quit: false,
        }
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.view.mount();

        loop {
            self.tick();

            // Draw the UI
            terminal.draw(|f| self.draw(f))?;

            // Poll so the settled state shows up without a key press
            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Record the moment the view leaves `Loading`
    pub fn tick(&mut self) {
        if self.loaded_at.is_none() && !self.view.snapshot().is_loading() {
            let now = chrono::Local::now();
            info!("View for {} settled at {}", self.view.table(), now.format("%H:%M:%S"));
            self.loaded_at = Some(now);
        }
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let max_scroll = self.max_scroll();

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_offset = self.scroll_offset.saturating_add(1).min(max_scroll);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(20).min(max_scroll);
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(20);
            }
            KeyCode::Home | KeyCode::Char('g') => self.scroll_offset = 0,
            KeyCode::End | KeyCode::Char('G') => self.scroll_offset = max_scroll,
            _ => {}
        }
    }

    /// Last line that can be scrolled to the top of the content area
    fn max_scroll(&self) -> u16 {
        let total = content_lines(&self.view.view()).len();
        u16::try_from(total.saturating_sub(1)).unwrap_or(u16::MAX)
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        // Main layout: status bar at bottom, content area above
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_content(f, chunks[0]);
        self.draw_status_bar(f, chunks[1]);
    }

    fn draw_content(&self, f: &mut Frame, area: Rect) {
        let rendered = self.view.view();
        let title = match &rendered {
            Rendered::Records { heading, .. } => heading.clone(),
            _ => self.view.table().to_string(),
        };

        let block = Block::default()
            .title(Span::styled(title, Styles::title()))
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        let paragraph = Paragraph::new(content_lines(&rendered))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll_offset, 0));

        f.render_widget(paragraph, area);
    }

    /// Draw status bar with table info and shortcuts
    fn draw_status_bar(&self, f: &mut Frame, area: Rect) {
        let state = self.view.snapshot();

        let detail = match (&state, self.loaded_at) {
            (DisplayState::Ready { records }, Some(at)) => {
                format!("{} rows at {}", records.len(), at.format("%H:%M:%S"))
            }
            _ => state.as_str().to_string(),
        };

        let status_text = format!(
            "rowview - {} ({}) | {} | ↑/↓: Scroll | Q: Quit",
            self.view.table(),
            self.source_label,
            detail
        );

        let style = match state {
            DisplayState::Loading => Styles::warning(),
            DisplayState::Failed { .. } => Styles::error(),
            DisplayState::Ready { .. } => Styles::success(),
        };

        let status_bar = Paragraph::new(status_text)
            .style(style)
            .block(Block::default().borders(Borders::ALL).border_style(Styles::inactive()));

        f.render_widget(status_bar, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSource;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;
    use serde_json::json;
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    async fn settled_app(rows: Vec<serde_json::Value>) -> App {
        let rows = rows.into_iter().map(|v| v.as_object().cloned().unwrap()).collect();
        let mut view = RecordListView::new(Arc::new(StaticSource::with_rows(rows)), "members", 10);
        view.mount();
        view.settled().await;

        let mut app = App::new(view, "static");
        app.tick();
        app
    }

    #[tokio::test]
    async fn test_draw_ready_state() {
        let mut app = settled_app(vec![json!({"name": "Ada"})]).await;
        assert!(app.loaded_at.is_some());

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Supabase Data Example"));
        assert!(text.contains("\"name\": \"Ada\""));
        assert!(text.contains("1 rows at"));
    }

    #[tokio::test]
    async fn test_draw_loading_state() {
        let view = RecordListView::new(Arc::new(StaticSource::with_rows(vec![])), "members", 10);
        let mut app = App::new(view, "static");

        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();

        assert!(buffer_text(&terminal).contains("Loading..."));
        assert!(app.loaded_at.is_none());
    }

    #[tokio::test]
    async fn test_scroll_is_bounded() {
        let mut app = settled_app(vec![json!({"a": 1}), json!({"b": 2})]).await;
        // 2 separators + 6 JSON lines + 1 blank
        assert_eq!(app.max_scroll(), 8);

        app.handle_key_event(key(KeyCode::Up));
        assert_eq!(app.scroll_offset, 0);

        app.handle_key_event(key(KeyCode::Char('G')));
        assert_eq!(app.scroll_offset, 8);

        app.handle_key_event(key(KeyCode::Down));
        assert_eq!(app.scroll_offset, 8);

        app.handle_key_event(key(KeyCode::Char('g')));
        assert_eq!(app.scroll_offset, 0);
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = settled_app(vec![]).await;
        app.handle_key_event(key(KeyCode::Char('x')));
        assert!(!app.should_quit);

        app.handle_key_event(key(KeyCode::Esc));
        assert!(app.should_quit);
    }
}
