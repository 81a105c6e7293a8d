//! CSV adapter: Implementation of PatientSource.
//!
//! Reads the historical extract (one row per patient, header row first).
//! Fields are trimmed; columns are matched by header name so extra columns
//! and column order do not matter.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::{PatientRecord, RecordedOutcomes};
use crate::ports::PatientSource;
use crate::AnalyzerError;

/// Row as it appears in the file, before numeric validation.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    id: String,
    #[serde(rename = "GTV", default)]
    gtv: String,
    #[serde(rename = "PTV", default)]
    ptv: String,
    #[serde(rename = "EIV_5mm_d", default)]
    eiv_5mm_d: String,
    #[serde(rename = "EIV_5mm_s", default)]
    eiv_5mm_s: String,
    #[serde(rename = "EIV_5mm_b", default)]
    eiv_5mm_b: String,
    #[serde(rename = "EIV_5mm_t", default)]
    eiv_5mm_t: String,
    #[serde(rename = "PTV V40G %", default)]
    ptv_v40g_pct: String,
    #[serde(rename = "GTV V47G %", default)]
    gtv_v47g_pct: String,
    #[serde(rename = "GTV V50G %", default)]
    gtv_v50g_pct: String,
}

impl RawRow {
    /// Convert to a record. `Ok(None)` means the row has no identifier and is
    /// dropped silently.
    fn into_record(self) -> Result<Option<PatientRecord>, String> {
        if self.id.trim().is_empty() {
            return Ok(None);
        }

        let gtv = required("GTV", &self.gtv)?;
        let ptv = required("PTV", &self.ptv)?;
        let eiv_5mm_t = required("EIV_5mm_t", &self.eiv_5mm_t)?;

        let record = PatientRecord::new(self.id, gtv, ptv, eiv_5mm_t)
            .map_err(|e| e.to_string())?
            .with_partial_eiv(
                optional(&self.eiv_5mm_d),
                optional(&self.eiv_5mm_s),
                optional(&self.eiv_5mm_b),
            )
            .with_outcomes(RecordedOutcomes {
                ptv_v40g_pct: optional(&self.ptv_v40g_pct),
                gtv_v47g_pct: optional(&self.gtv_v47g_pct),
                gtv_v50g_pct: optional(&self.gtv_v50g_pct),
            });

        Ok(Some(record))
    }
}

fn required(label: &str, raw: &str) -> Result<f64, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(format!("{label} is missing"));
    }
    raw.parse::<f64>()
        .map_err(|_| format!("{label} is not a number: {raw:?}"))
}

fn optional(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Historical patients stored in a CSV file.
#[derive(Debug, Clone)]
pub struct CsvPatientSource {
    path: PathBuf,
}

impl CsvPatientSource {
    /// Create a source reading from `path`. The file is not opened until
    /// [`PatientSource::load`] is called.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PatientSource for CsvPatientSource {
    fn load(&self) -> Result<Vec<PatientRecord>, AnalyzerError> {
        if !self.path.is_file() {
            return Err(AnalyzerError::DataUnavailable(format!(
                "{} does not exist",
                self.path.display()
            )));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| AnalyzerError::DataUnavailable(format!("{}: {e}", self.path.display())))?;

        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (index, row) in reader.deserialize::<RawRow>().enumerate() {
            // Header is line 1.
            let line = index + 2;
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    tracing::warn!("Skipping unreadable row at line {}: {}", line, e);
                    skipped += 1;
                    continue;
                }
            };

            match row.into_record() {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(reason) => {
                    tracing::warn!("Skipping row at line {}: {}", line, reason);
                    skipped += 1;
                }
            }
        }

        tracing::info!(
            "Loaded {} patients from {} ({} malformed rows skipped)",
            records.len(),
            self.path.display(),
            skipped
        );

        Ok(records)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
