//! TUI module: Terminal User Interface using Ratatui.
//!
//! Screens:
//! - Dashboard with dataset status
//! - Analyzer with the measurement form, predicted outcomes and similar patients

mod app;
mod styles;
mod ui;

pub use app::{App, Notice, Screen};
pub use styles::AnalyzerTheme;
