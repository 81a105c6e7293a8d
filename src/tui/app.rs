//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Mapping service results and errors onto the screens

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::adapters::{CsvPatientSource, JsonReportWriter};
use crate::application::AnalyzerService;
use crate::config::Settings;
use crate::ports::{NeighborReport, PredictionReport, ReportSink};
use crate::tui::styles::AnalyzerTheme;
use crate::AnalyzerError;

use super::ui::{
    dashboard::{render_dashboard, DashboardState},
    query::{render_query_form, QueryFormState},
    render_disclaimer,
    results::{render_neighbor_table, render_prediction_panel, ResultsState},
};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Analyzer,
}

/// Message shown in the analyzer footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Main application state
pub struct App<R: ReportSink = JsonReportWriter> {
    screen: Screen,
    should_quit: bool,
    settings: Settings,
    service: AnalyzerService<CsvPatientSource>,
    reports: R,
    dashboard_state: DashboardState,
    form_state: QueryFormState,
    results_state: ResultsState,
    notice: Option<Notice>,
}

impl App<JsonReportWriter> {
    /// Create the application for `settings` and load the dataset.
    ///
    /// A missing or empty dataset is not fatal: the session starts with an
    /// empty collection and the error is shown on the dashboard.
    pub fn new(settings: Settings) -> Self {
        let service = AnalyzerService::new(CsvPatientSource::new(&settings.csv_file));
        let reports = JsonReportWriter::new(&settings.out_folder);
        let mut app = Self::with_dependencies(settings, service, reports);
        app.reload_data();
        app
    }
}

impl<R: ReportSink> App<R> {
    /// Create application with injected dependencies.
    pub fn with_dependencies(
        settings: Settings,
        service: AnalyzerService<CsvPatientSource>,
        reports: R,
    ) -> Self {
        let mut app = Self {
            screen: Screen::Dashboard,
            should_quit: false,
            settings,
            service,
            reports,
            dashboard_state: DashboardState::default(),
            form_state: QueryFormState::default(),
            results_state: ResultsState::default(),
            notice: None,
        };
        app.update_dashboard_state();
        app
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn draw(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(f.area());

        match self.screen {
            Screen::Dashboard => render_dashboard(f, chunks[0], &self.dashboard_state),
            Screen::Analyzer => self.draw_analyzer(f, chunks[0]),
        }

        render_disclaimer(f, chunks[1]);
    }

    fn draw_analyzer(&self, f: &mut Frame, area: Rect) {
        let capacity = self.service.neighbor_count();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),                    // Header
                Constraint::Length(3),                    // Form
                Constraint::Length(4),                    // Prediction
                Constraint::Length(capacity as u16 + 3), // Neighbour table
                Constraint::Min(0),
                Constraint::Length(3), // Footer
            ])
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled(" ", AnalyzerTheme::text()),
            Span::styled("New Patient", AnalyzerTheme::title()),
            Span::styled(
                format!(" │ {} historical patients", self.dashboard_state.records_loaded),
                AnalyzerTheme::text_secondary(),
            ),
        ]))
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(AnalyzerTheme::border()),
        );
        f.render_widget(header, chunks[0]);

        render_query_form(f, chunks[1], &self.form_state);
        render_prediction_panel(f, chunks[2], &self.results_state);
        render_neighbor_table(f, chunks[3], &self.results_state, capacity);
        self.draw_footer(f, chunks[5]);
    }

    fn draw_footer(&self, f: &mut Frame, area: Rect) {
        let content = match &self.notice {
            Some(Notice::Error(message)) => Line::from(vec![
                Span::styled("! ", AnalyzerTheme::danger()),
                Span::styled(message.clone(), AnalyzerTheme::danger()),
            ]),
            Some(Notice::Info(message)) => {
                Line::from(Span::styled(message.clone(), AnalyzerTheme::success()))
            }
            None => {
                let hints = [
                    ("[Tab] ", "Next "),
                    ("[Enter] ", "Search "),
                    ("[P] ", "Predict "),
                    ("[M] ", "Metric "),
                    ("[R] ", "Reload "),
                    ("[E] ", "Export "),
                    ("[S] ", "Sample "),
                    ("[C] ", "Clear "),
                    ("[Esc] ", "Back"),
                ];
                Line::from(
                    hints
                        .into_iter()
                        .flat_map(|(key, desc)| {
                            [
                                Span::styled(key, AnalyzerTheme::key_hint()),
                                Span::styled(desc, AnalyzerTheme::key_desc()),
                            ]
                        })
                        .collect::<Vec<_>>(),
                )
            }
        };

        let footer = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(AnalyzerTheme::border()),
        );
        f.render_widget(footer, area);
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if matches!(key, KeyCode::Char('c') | KeyCode::Char('q'))
            && modifiers.contains(KeyModifiers::CONTROL)
        {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::Analyzer => self.handle_analyzer_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Enter => {
                self.screen = Screen::Analyzer;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.reload_data(),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_analyzer_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.notice = None;
                self.update_dashboard_state();
                self.screen = Screen::Dashboard;
            }
            KeyCode::Tab | KeyCode::Down | KeyCode::Right => self.form_state.next_field(),
            KeyCode::BackTab | KeyCode::Up | KeyCode::Left => self.form_state.prev_field(),
            KeyCode::Enter => self.search(),
            KeyCode::Char('p') | KeyCode::Char('P') => self.predict(),
            KeyCode::Char('m') | KeyCode::Char('M') => {
                self.form_state.cycle_metric();
                self.notice = None;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.reload_data(),
            KeyCode::Char('e') | KeyCode::Char('E') => self.export(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.form_state.load_sample_data(),
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.form_state.clear_all();
                self.results_state = ResultsState::default();
                self.notice = None;
            }
            KeyCode::Char(c) => {
                if self.form_state.input_char(c) {
                    self.notice = None;
                }
            }
            KeyCode::Backspace => self.form_state.delete_char(),
            KeyCode::Delete => self.form_state.clear_field(),
            _ => {}
        }
    }

    fn search(&mut self) {
        let metric = self.form_state.metric;
        let outcome = self
            .form_state
            .to_query()
            .and_then(|query| Ok((query, self.service.search(&query, metric)?)));

        match outcome {
            Ok((query, neighbors)) => {
                self.notice = Some(Notice::Info(format!(
                    "{} closest patients by {} distance",
                    neighbors.len(),
                    metric
                )));
                self.results_state.neighbors = Some(NeighborReport {
                    generated_at: chrono::Utc::now(),
                    query,
                    metric,
                    neighbors,
                });
            }
            Err(e) => self.show_error(&e),
        }
    }

    fn predict(&mut self) {
        let outcome = self
            .form_state
            .to_query()
            .and_then(|query| Ok((query, self.service.predict(&query)?)));

        match outcome {
            Ok((query, prediction)) => {
                self.notice = Some(Notice::Info("Outcomes predicted".to_string()));
                self.results_state.prediction = Some(PredictionReport {
                    generated_at: chrono::Utc::now(),
                    query,
                    prediction,
                });
            }
            Err(e) => self.show_error(&e),
        }
    }

    fn export(&mut self) {
        let mut written = Vec::new();
        let mut result: Result<(), AnalyzerError> = Ok(());

        if let Some(report) = &self.results_state.neighbors {
            match self.reports.write_neighbors(report) {
                Ok(path) => written.push(path),
                Err(e) => result = Err(e),
            }
        }
        if let Some(report) = &self.results_state.prediction {
            match self.reports.write_prediction(report) {
                Ok(path) => written.push(path),
                Err(e) => result = Err(e),
            }
        }

        if let Err(e) = result {
            self.show_error(&e);
        } else if written.is_empty() {
            self.show_error(&AnalyzerError::InvalidInput(
                "nothing to export yet: run a search or prediction first".to_string(),
            ));
        } else {
            self.notice = Some(Notice::Info(format!(
                "Exported {} report(s) to {}",
                written.len(),
                self.settings.out_folder.display()
            )));
        }
    }

    fn reload_data(&mut self) {
        match self.service.reload() {
            Ok(count) => {
                self.dashboard_state.last_reload_error = None;
                self.notice = Some(Notice::Info(format!("Reloaded {count} historical patients")));
            }
            Err(e) => {
                tracing::error!("Reload failed: {}", e);
                self.dashboard_state.last_reload_error = Some(e.to_string());
                self.show_error(&e);
            }
        }
        // Results computed against the previous collection are stale.
        self.results_state.neighbors = None;
        self.update_dashboard_state();
    }

    fn show_error(&mut self, err: &AnalyzerError) {
        let message = match err {
            AnalyzerError::InvalidInput(detail) => {
                format!("Input values are missing or malformed: {detail}")
            }
            AnalyzerError::EmptyDataset => {
                "No historical patients loaded. Press [R] to reload the data file.".to_string()
            }
            other => other.to_string(),
        };
        tracing::warn!("{}", message);
        self.notice = Some(Notice::Error(message));
    }

    fn update_dashboard_state(&mut self) {
        let snapshot = self.service.snapshot();
        self.dashboard_state.records_loaded = snapshot.len();
        self.dashboard_state.loaded_at = snapshot.loaded_at;
        self.dashboard_state.source = self.service.source_description();
        self.dashboard_state.tmp_folder = self.settings.tmp_folder.display().to_string();
        self.dashboard_state.out_folder = self.settings.out_folder.display().to_string();
        self.dashboard_state.neighbor_count = self.service.neighbor_count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_csv(dir: &tempfile::TempDir, contents: &str) -> Settings {
        let csv_file = dir.path().join("patients.csv");
        std::fs::write(&csv_file, contents).expect("Should write csv");
        Settings {
            csv_file,
            tmp_folder: dir.path().join("tmp"),
            out_folder: dir.path().join("output"),
        }
    }

    fn sample_app(dir: &tempfile::TempDir) -> App {
        App::new(settings_with_csv(
            dir,
            "id,GTV,PTV,EIV_5mm_t\n1,30,80,6\n2,10,20,1\n3,33,77,6.5\n",
        ))
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            app.handle_key(*key, KeyModifiers::NONE);
        }
    }

    #[test]
    fn test_startup_loads_dataset() {
        let dir = tempfile::tempdir().expect("Should create dir");
        let app = sample_app(&dir);
        assert_eq!(app.screen, Screen::Dashboard);
        assert_eq!(app.dashboard_state.records_loaded, 3);
        assert!(app.dashboard_state.last_reload_error.is_none());
    }

    #[test]
    fn test_missing_csv_is_reported_not_fatal() {
        let dir = tempfile::tempdir().expect("Should create dir");
        let settings = Settings {
            csv_file: dir.path().join("absent.csv"),
            tmp_folder: dir.path().join("tmp"),
            out_folder: dir.path().join("output"),
        };
        let app = App::new(settings);
        assert_eq!(app.dashboard_state.records_loaded, 0);
        assert!(app.dashboard_state.last_reload_error.is_some());
        assert!(matches!(app.notice, Some(Notice::Error(_))));
    }

    #[test]
    fn test_search_with_sample_query() {
        let dir = tempfile::tempdir().expect("Should create dir");
        let mut app = sample_app(&dir);
        press(&mut app, &[KeyCode::Char('n'), KeyCode::Char('s'), KeyCode::Enter]);

        assert_eq!(app.screen, Screen::Analyzer);
        let report = app.results_state.neighbors.as_ref().expect("Should have results");
        assert_eq!(report.neighbors.len(), 3);
        assert_eq!(report.neighbors[0].record.id, "3");
        assert!(matches!(app.notice, Some(Notice::Info(_))));
    }

    #[test]
    fn test_search_with_empty_form_shows_error() {
        let dir = tempfile::tempdir().expect("Should create dir");
        let mut app = sample_app(&dir);
        press(&mut app, &[KeyCode::Char('n'), KeyCode::Enter]);

        assert!(app.results_state.neighbors.is_none());
        assert!(matches!(&app.notice, Some(Notice::Error(m)) if m.contains("missing or malformed")));
    }

    #[test]
    fn test_predict_fills_six_outcomes() {
        let dir = tempfile::tempdir().expect("Should create dir");
        let mut app = sample_app(&dir);
        press(&mut app, &[KeyCode::Char('n'), KeyCode::Char('s'), KeyCode::Char('p')]);

        let report = app.results_state.prediction.as_ref().expect("Should predict");
        assert_eq!(report.prediction.iter().count(), 6);
    }

    #[test]
    fn test_export_requires_results() {
        let dir = tempfile::tempdir().expect("Should create dir");
        let mut app = sample_app(&dir);
        press(&mut app, &[KeyCode::Char('n'), KeyCode::Char('e')]);
        assert!(matches!(app.notice, Some(Notice::Error(_))));

        press(&mut app, &[KeyCode::Char('s'), KeyCode::Enter, KeyCode::Char('p'), KeyCode::Char('e')]);
        assert!(matches!(app.notice, Some(Notice::Info(_))));
        let written = std::fs::read_dir(dir.path().join("output"))
            .expect("Should create output folder")
            .count();
        assert_eq!(written, 2);
    }

    #[test]
    fn test_clear_resets_form_and_results() {
        let dir = tempfile::tempdir().expect("Should create dir");
        let mut app = sample_app(&dir);
        press(&mut app, &[KeyCode::Char('n'), KeyCode::Char('s'), KeyCode::Enter, KeyCode::Char('c')]);

        assert!(app.form_state.fields.iter().all(|f| f.value.is_empty()));
        assert!(app.results_state.neighbors.is_none());
    }

    #[test]
    fn test_quit_keys() {
        let dir = tempfile::tempdir().expect("Should create dir");
        let mut app = sample_app(&dir);
        press(&mut app, &[KeyCode::Char('n'), KeyCode::Esc]);
        assert_eq!(app.screen, Screen::Dashboard);
        assert!(!app.should_quit);

        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }
}
