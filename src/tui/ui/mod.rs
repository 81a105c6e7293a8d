//! UI module: View components for the TUI.

pub mod dashboard;
pub mod query;
pub mod results;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::AnalyzerTheme;

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: Predictions come from a fixed regression calibration and similar cases from a local historical extract.",
            AnalyzerTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "They support, and do not replace, treatment planning review.",
            AnalyzerTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(AnalyzerTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

/// Two-decimal display used for every number shown to the user.
#[must_use]
pub fn format_value(value: f64) -> String {
    format!("{value:.2}")
}

/// Like [`format_value`], with `-` for missing values.
#[must_use]
pub fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), format_value)
}
