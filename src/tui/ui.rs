//! Styles and text layout for the record viewer

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::view::Rendered;

/// Common UI styles
pub struct Styles;

impl Styles {
    pub fn title() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Color::Red)
    }

    pub fn success() -> Style {
        Style::default()
            .fg(Color::Green)
    }

    pub fn warning() -> Style {
        Style::default()
            .fg(Color::Yellow)
    }

    pub fn info() -> Style {
        Style::default()
            .fg(Color::Cyan)
    }

    pub fn inactive() -> Style {
        Style::default()
            .fg(Color::Gray)
    }

    pub fn inactive_border() -> Style {
        Style::default()
            .fg(Color::Gray)
    }
}

/// Lay out rendered output as styled lines for a scrolling paragraph
pub fn content_lines(rendered: &Rendered) -> Vec<Line<'static>> {
    match rendered {
        Rendered::Loading => vec![Line::styled(rendered.to_text(), Styles::warning())],
        Rendered::Error(_) => vec![Line::styled(rendered.to_text(), Styles::error())],
        Rendered::Records { blocks, .. } => {
            let mut lines = Vec::new();
            for (index, block) in blocks.iter().enumerate() {
                if index > 0 {
                    lines.push(Line::default());
                }
                lines.push(Line::from(Span::styled(
                    format!("── Record {} ──", index + 1),
                    Styles::info(),
                )));
                lines.extend(block.lines().map(|line| Line::raw(line.to_string())));
            }
            lines
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_lines_for_records() {
        let rendered = Rendered::Records {
            heading: "Supabase Data Example".to_string(),
            blocks: vec!["{\n  \"a\": 1\n}".to_string(), "{}".to_string()],
        };
        let lines = content_lines(&rendered);

        // separator + 3 lines, blank, separator + 1 line
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[1].spans[0].content, "{");
        assert_eq!(lines[5].spans[0].content, "── Record 2 ──");
    }

    #[test]
    fn test_content_lines_for_states() {
        let lines = content_lines(&Rendered::Error("permission denied".to_string()));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans[0].content, "Error: permission denied");

        let lines = content_lines(&Rendered::Loading);
        assert_eq!(lines[0].spans[0].content, "Loading...");
    }

    #[test]
    fn test_content_lines_for_empty_records() {
        let rendered = Rendered::Records {
            heading: "Supabase Data Example".to_string(),
            blocks: vec![],
        };
        assert!(content_lines(&rendered).is_empty());
    }
}
