//! Measurement input form and metric selector.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{DistanceMetric, QueryTriple, QUERY_FIELD_NAMES};
use crate::tui::styles::AnalyzerTheme;
use crate::AnalyzerError;

/// Form field definition
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub hint: &'static str,
    pub value: String,
}

/// Query form state
pub struct QueryFormState {
    /// GTV, PTV, EIV_5mm_t, in that order
    pub fields: [FormField; 3],
    pub selected_field: usize,
    pub metric: DistanceMetric,
}

const GTV: usize = 0;
const PTV: usize = 1;
const EIV_5MM_T: usize = 2;

impl Default for QueryFormState {
    fn default() -> Self {
        let hints = ["cm3", "cm3", "cm3"];
        let fields = [GTV, PTV, EIV_5MM_T].map(|i| FormField {
            label: QUERY_FIELD_NAMES[i],
            hint: hints[i],
            value: String::new(),
        });
        Self {
            fields,
            selected_field: 0,
            metric: DistanceMetric::default(),
        }
    }
}

impl QueryFormState {
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        self.selected_field = (self.selected_field + self.fields.len() - 1) % self.fields.len();
    }

    /// Append a character to the current field. Only digits and a single
    /// decimal point are accepted.
    pub fn input_char(&mut self, c: char) -> bool {
        let value = &mut self.fields[self.selected_field].value;
        let accepted = c.is_ascii_digit() || (c == '.' && !value.contains('.'));
        if accepted {
            value.push(c);
        }
        accepted
    }

    pub fn delete_char(&mut self) {
        self.fields[self.selected_field].value.pop();
    }

    pub fn clear_field(&mut self) {
        self.fields[self.selected_field].value.zeroize();
    }

    /// Wipe every field buffer and reset the cursor.
    pub fn clear_all(&mut self) {
        for field in self.fields.iter_mut() {
            field.value.zeroize();
        }
        self.selected_field = 0;
    }

    pub fn cycle_metric(&mut self) {
        self.metric = self.metric.next();
    }

    /// Validate the fields into a query.
    ///
    /// # Errors
    /// Returns `InvalidInput` if a field is missing or malformed.
    pub fn to_query(&self) -> Result<QueryTriple, AnalyzerError> {
        QueryTriple::parse(
            &self.fields[PTV].value,
            &self.fields[GTV].value,
            &self.fields[EIV_5MM_T].value,
        )
    }

    /// Load a typical mid-size case for demonstrations.
    pub fn load_sample_data(&mut self) {
        let sample = ["32.5", "78.4", "6.2"];
        for (field, value) in self.fields.iter_mut().zip(sample) {
            field.value = value.to_string();
        }
    }
}

/// Render the measurement form and the metric selector.
pub fn render_query_form(f: &mut Frame, area: Rect, state: &QueryFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    for (i, field) in state.fields.iter().enumerate() {
        render_field(f, columns[i], field, i == state.selected_field);
    }

    render_metric_selector(f, columns[3], state.metric);
}

fn render_field(f: &mut Frame, area: Rect, field: &FormField, is_selected: bool) {
    let (border_style, title_style) = if is_selected {
        (AnalyzerTheme::border_focused(), AnalyzerTheme::focused())
    } else {
        (AnalyzerTheme::border(), AnalyzerTheme::text_secondary())
    };

    let block = Block::default()
        .title(Span::styled(format!(" {} ", field.label), title_style))
        .borders(Borders::ALL)
        .border_style(border_style);

    let value_display = if field.value.is_empty() {
        Span::styled(field.hint, AnalyzerTheme::text_muted())
    } else {
        Span::styled(field.value.as_str(), AnalyzerTheme::text())
    };

    let content = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        value_display,
        if is_selected {
            Span::styled("▌", AnalyzerTheme::cursor())
        } else {
            Span::raw("")
        },
    ]))
    .block(block);

    f.render_widget(content, area);
}

fn render_metric_selector(f: &mut Frame, area: Rect, selected: DistanceMetric) {
    let spans: Vec<Span> = DistanceMetric::ALL
        .iter()
        .flat_map(|metric| {
            let style = if *metric == selected {
                AnalyzerTheme::focused()
            } else {
                AnalyzerTheme::text_muted()
            };
            [Span::styled(metric.to_string(), style), Span::raw(" ")]
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(" Distance [M] ", AnalyzerTheme::text_secondary()))
        .borders(Borders::ALL)
        .border_style(AnalyzerTheme::border());

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_into(state: &mut QueryFormState, text: &str) {
        for c in text.chars() {
            state.input_char(c);
        }
    }

    #[test]
    fn test_input_filters_characters() {
        let mut state = QueryFormState::default();
        type_into(&mut state, "1a2.5.-3");
        assert_eq!(state.fields[0].value, "12.53");
    }

    #[test]
    fn test_to_query_maps_fields() {
        let mut state = QueryFormState::default();
        type_into(&mut state, "5");
        state.next_field();
        type_into(&mut state, "10");
        state.next_field();
        type_into(&mut state, "2");

        let query = state.to_query().expect("Should parse");
        assert_eq!(query.gtv, 5.0);
        assert_eq!(query.ptv, 10.0);
        assert_eq!(query.eiv_5mm_t, 2.0);
    }

    #[test]
    fn test_missing_field_is_invalid() {
        let mut state = QueryFormState::default();
        state.load_sample_data();
        state.selected_field = 1;
        state.clear_field();
        assert!(matches!(state.to_query(), Err(AnalyzerError::InvalidInput(_))));
    }

    #[test]
    fn test_navigation_wraps_and_clear_all() {
        let mut state = QueryFormState::default();
        state.prev_field();
        assert_eq!(state.selected_field, 2);
        state.next_field();
        assert_eq!(state.selected_field, 0);

        state.load_sample_data();
        state.clear_all();
        assert!(state.fields.iter().all(|f| f.value.is_empty()));
    }

    #[test]
    fn test_cycle_metric() {
        let mut state = QueryFormState::default();
        state.cycle_metric();
        assert_eq!(state.metric, DistanceMetric::Canberra);
    }
}
