//! Dashboard view: dataset status and workspace overview.

use chrono::{DateTime, Local, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::styles::AnalyzerTheme;

/// Dashboard state for rendering.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub records_loaded: usize,
    pub source: String,
    pub loaded_at: Option<DateTime<Utc>>,
    pub last_reload_error: Option<String>,
    pub tmp_folder: String,
    pub out_folder: String,
    pub neighbor_count: usize,
}

/// Render the main dashboard view.
pub fn render_dashboard(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    render_header(f, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .margin(1)
        .split(chunks[1]);

    render_dataset_status(f, columns[0], state);
    render_quick_actions(f, columns[1]);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", AnalyzerTheme::text()),
        Span::styled("Pancreas Analyzer", AnalyzerTheme::title()),
        Span::styled(" │ ", AnalyzerTheme::text_muted()),
        Span::styled(
            "Similar Cases & Dosimetric Outcome Prediction",
            AnalyzerTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(AnalyzerTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_dataset_status(f: &mut Frame, area: Rect, state: &DashboardState) {
    let (icon, icon_style) = if state.records_loaded > 0 {
        ("OK", AnalyzerTheme::success())
    } else {
        ("EMPTY", AnalyzerTheme::warning())
    };

    let loaded_at = state.loaded_at.map_or_else(
        || "never".to_string(),
        |t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
    );

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("  {icon} "), icon_style),
            Span::styled(
                format!("{} historical patients", state.records_loaded),
                AnalyzerTheme::text(),
            ),
        ]),
        labelled("Source", &state.source),
        labelled("Loaded", &loaded_at),
        labelled("Scratch", &state.tmp_folder),
        labelled("Output", &state.out_folder),
        labelled("Neighbours shown", &state.neighbor_count.to_string()),
    ];

    if let Some(err) = &state.last_reload_error {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  ! ", AnalyzerTheme::danger()),
            Span::styled(err.clone(), AnalyzerTheme::danger()),
        ]));
    }

    let block = Block::default()
        .title(Span::styled(" Historical Dataset ", AnalyzerTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(AnalyzerTheme::border());

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn labelled(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label}: "), AnalyzerTheme::text_secondary()),
        Span::styled(value.to_string(), AnalyzerTheme::text()),
    ])
}

fn render_quick_actions(f: &mut Frame, area: Rect) {
    let actions = [
        ("[N] ", "New Query"),
        ("[R] ", "Reload Data"),
        ("[Q] ", "Quit"),
    ]
    .into_iter()
    .map(|(key, desc)| {
        Line::from(vec![
            Span::styled(key, AnalyzerTheme::key_hint()),
            Span::styled(desc, AnalyzerTheme::key_desc()),
        ])
    })
    .collect::<Vec<_>>();

    let block = Block::default()
        .title(Span::styled(" Quick Actions ", AnalyzerTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(AnalyzerTheme::border());

    f.render_widget(Paragraph::new(actions).block(block), area);
}
