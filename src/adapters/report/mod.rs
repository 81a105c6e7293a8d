//! JSON report adapter: Implementation of ReportSink.
//!
//! Writes one pretty-printed JSON file per export into the output folder.
//! File names carry a UTC timestamp; a name that is already taken gets a
//! numeric suffix, so repeated exports never overwrite.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::ports::{NeighborReport, PredictionReport, ReportSink};
use crate::AnalyzerError;

/// Report writer targeting a directory.
#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    out_dir: PathBuf,
}

impl JsonReportWriter {
    pub fn new<P: AsRef<Path>>(out_dir: P) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }

    fn write<T: Serialize>(
        &self,
        prefix: &str,
        generated_at: chrono::DateTime<chrono::Utc>,
        report: &T,
    ) -> Result<PathBuf, AnalyzerError> {
        fs::create_dir_all(&self.out_dir)?;

        let stamp = generated_at.format("%Y%m%dT%H%M%S%.3fZ");
        let json = serde_json::to_string_pretty(report)?;

        let mut attempt = 0u32;
        let (path, mut file) = loop {
            let name = if attempt == 0 {
                format!("{prefix}-{stamp}.json")
            } else {
                format!("{prefix}-{stamp}-{attempt}.json")
            };
            let path = self.out_dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (path, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        };
        file.write_all(json.as_bytes())?;

        tracing::info!("Wrote {} report to {}", prefix, path.display());
        Ok(path)
    }
}

impl ReportSink for JsonReportWriter {
    fn write_neighbors(&self, report: &NeighborReport) -> Result<PathBuf, AnalyzerError> {
        self.write("neighbors", report.generated_at, report)
    }

    fn write_prediction(&self, report: &PredictionReport) -> Result<PathBuf, AnalyzerError> {
        self.write("prediction", report.generated_at, report)
    }
}
