//! Pancreas Analyzer: similar-case retrieval and dosimetric outcome prediction.
//!
//! Main entry point for the terminal application.

use anyhow::{Context, Result};
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pancreas_analyzer::adapters::{sanitize::SanitizingMakeWriter, workspace};
use pancreas_analyzer::config::Settings;
use pancreas_analyzer::tui::App;

fn main() -> Result<()> {
    // Logs written to the terminal would corrupt the alternate screen, so an
    // interactive session logs to a file unless told otherwise.
    let log_mode = std::env::var("PANCREAS_LOG_MODE").unwrap_or_else(|_| "auto".to_string());

    let interactive = std::io::stdout().is_terminal();
    let use_file = match log_mode.as_str() {
        "file" => true,
        "stdout" => false,
        // auto
        _ => interactive,
    };

    let (writer, _guard) = if use_file {
        let log_file = std::env::var("PANCREAS_LOG_FILE")
            .unwrap_or_else(|_| "pancreas-analyzer.log".to_string());

        if let Some(parent) = std::path::Path::new(&log_file).parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .with_context(|| format!("opening log file {log_file}"))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting Pancreas Analyzer...");

    let settings = Settings::load().context("loading configuration")?;
    workspace::prepare(&settings).context("preparing working folders")?;

    let mut app = App::new(settings);
    app.run()?;

    tracing::info!("Pancreas Analyzer shutdown complete.");
    Ok(())
}
