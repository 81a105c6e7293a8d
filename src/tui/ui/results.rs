//! Prediction panel and similar-patient table.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ports::{NeighborReport, PredictionReport};
use crate::tui::styles::AnalyzerTheme;

use super::{format_optional, format_value};

/// Latest results of the session
#[derive(Debug, Clone, Default)]
pub struct ResultsState {
    pub neighbors: Option<NeighborReport>,
    pub prediction: Option<PredictionReport>,
}

/// Column headers of the neighbour table.
pub const NEIGHBOR_COLUMNS: [&str; 11] = [
    "id",
    "GTV",
    "PTV",
    "EIV_5mm_d",
    "EIV_5mm_s",
    "EIV_5mm_b",
    "EIV_5mm_t",
    "Distance",
    "PTV V40G %",
    "GTV V47G %",
    "GTV V50G %",
];

/// Render the six predicted outcomes side by side.
pub fn render_prediction_panel(f: &mut Frame, area: Rect, state: &ResultsState) {
    let block = Block::default()
        .title(Span::styled(" Predicted Outcomes [P] ", AnalyzerTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(AnalyzerTheme::border());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(report) = &state.prediction else {
        let empty = Paragraph::new(Line::from(Span::styled(
            "Enter measurements and press [P] to predict.",
            AnalyzerTheme::text_muted(),
        )))
        .alignment(Alignment::Center);
        f.render_widget(empty, inner);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 6); 6])
        .split(inner);

    for (i, (key, value)) in report.prediction.iter().enumerate() {
        let cell = Paragraph::new(vec![
            Line::from(Span::styled(key.label(), AnalyzerTheme::text_secondary())),
            Line::from(Span::styled(format_value(value), AnalyzerTheme::outcome(key.kind()))),
        ])
        .alignment(Alignment::Center);
        f.render_widget(cell, columns[i]);
    }
}

/// Render the closest historical patients.
pub fn render_neighbor_table(f: &mut Frame, area: Rect, state: &ResultsState, capacity: usize) {
    let title = match &state.neighbors {
        Some(report) => format!(" Similar Patients ({}) ", report.metric),
        None => " Similar Patients ".to_string(),
    };
    let block = Block::default()
        .title(Span::styled(title, AnalyzerTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(AnalyzerTheme::border());

    let header = Row::new(
        NEIGHBOR_COLUMNS
            .iter()
            .map(|c| Cell::from(*c))
            .collect::<Vec<_>>(),
    )
    .style(AnalyzerTheme::table_header());

    let neighbors = state
        .neighbors
        .as_ref()
        .map(|r| r.neighbors.as_slice())
        .unwrap_or_default();

    // Always show `capacity` rows so the table does not jump between searches.
    let rows = (0..capacity).map(|i| match neighbors.get(i) {
        Some(n) => {
            let r = &n.record;
            Row::new(vec![
                Cell::from(r.id.clone()),
                Cell::from(format_value(r.gtv)),
                Cell::from(format_value(r.ptv)),
                Cell::from(format_optional(r.eiv_5mm_d)),
                Cell::from(format_optional(r.eiv_5mm_s)),
                Cell::from(format_optional(r.eiv_5mm_b)),
                Cell::from(format_value(r.eiv_5mm_t)),
                Cell::from(Span::styled(format_value(n.distance), AnalyzerTheme::distance())),
                Cell::from(format_optional(r.outcomes.ptv_v40g_pct)),
                Cell::from(format_optional(r.outcomes.gtv_v47g_pct)),
                Cell::from(format_optional(r.outcomes.gtv_v50g_pct)),
            ])
            .style(AnalyzerTheme::text())
        }
        None => Row::new(NEIGHBOR_COLUMNS.iter().map(|_| Cell::from("-")).collect::<Vec<_>>())
            .style(AnalyzerTheme::text_muted()),
    });

    let widths = [
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(11),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);

    f.render_widget(table, area);
}
