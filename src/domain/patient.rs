//! Patient record and query types for pancreatic tumor geometry.
//!
//! Measurements follow the historical dataset columns: GTV and PTV volumes in
//! cm3 and the 5 mm expansion intersection volumes (EIV_5mm_*).

use serde::{Deserialize, Serialize};

use crate::AnalyzerError;

/// Outcomes recorded for a historical patient (displayed next to neighbours).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordedOutcomes {
    /// PTV V40G (%)
    pub ptv_v40g_pct: Option<f64>,

    /// GTV V47G (%)
    pub gtv_v47g_pct: Option<f64>,

    /// GTV V50G (%)
    pub gtv_v50g_pct: Option<f64>,
}

/// A historical patient, validated at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Dataset identifier (never empty)
    pub id: String,

    /// Gross tumor volume (cm3)
    pub gtv: f64,

    /// Planning target volume (cm3)
    pub ptv: f64,

    /// EIV 5mm, duodenum
    pub eiv_5mm_d: Option<f64>,

    /// EIV 5mm, stomach
    pub eiv_5mm_s: Option<f64>,

    /// EIV 5mm, bowel
    pub eiv_5mm_b: Option<f64>,

    /// EIV 5mm, total
    pub eiv_5mm_t: f64,

    /// Recorded dosimetric outcomes
    pub outcomes: RecordedOutcomes,

    /// Scratch distance from the last query. Zero right after load; only the
    /// copies returned by a search carry a meaningful value.
    pub distance: f64,
}

impl PatientRecord {
    /// Create a record with the required measurements.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the identifier is blank or a measurement is
    /// not finite.
    pub fn new(id: impl Into<String>, gtv: f64, ptv: f64, eiv_5mm_t: f64) -> Result<Self, AnalyzerError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(AnalyzerError::InvalidInput("patient id is empty".to_string()));
        }
        for (label, value) in [("GTV", gtv), ("PTV", ptv), ("EIV_5mm_t", eiv_5mm_t)] {
            if !value.is_finite() {
                return Err(AnalyzerError::InvalidInput(format!("{label} is not a finite number")));
            }
        }

        Ok(Self {
            id,
            gtv,
            ptv,
            eiv_5mm_d: None,
            eiv_5mm_s: None,
            eiv_5mm_b: None,
            eiv_5mm_t,
            outcomes: RecordedOutcomes::default(),
            distance: 0.0,
        })
    }

    /// Attach the partial EIV measurements.
    #[must_use]
    pub fn with_partial_eiv(mut self, d: Option<f64>, s: Option<f64>, b: Option<f64>) -> Self {
        self.eiv_5mm_d = d;
        self.eiv_5mm_s = s;
        self.eiv_5mm_b = b;
        self
    }

    /// Attach recorded outcomes.
    #[must_use]
    pub fn with_outcomes(mut self, outcomes: RecordedOutcomes) -> Self {
        self.outcomes = outcomes;
        self
    }

    /// Measurement vector compared against a query, same order as
    /// [`QueryTriple::to_array`].
    #[must_use]
    pub fn triple(&self) -> [f64; 3] {
        [self.ptv, self.gtv, self.eiv_5mm_t]
    }
}

/// A historical patient paired with its distance to a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub record: PatientRecord,
    pub distance: f64,
}

/// The three measurements a clinician enters for a new patient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryTriple {
    /// Planning target volume (cm3)
    pub ptv: f64,
    /// Gross tumor volume (cm3)
    pub gtv: f64,
    /// EIV 5mm, total
    pub eiv_5mm_t: f64,
}

impl QueryTriple {
    /// Build a query from numeric values.
    ///
    /// # Errors
    /// Returns `InvalidInput` if any value is NaN or infinite.
    pub fn new(ptv: f64, gtv: f64, eiv_5mm_t: f64) -> Result<Self, AnalyzerError> {
        for (label, value) in [("PTV", ptv), ("GTV", gtv), ("EIV_5mm_t", eiv_5mm_t)] {
            if !value.is_finite() {
                return Err(AnalyzerError::InvalidInput(format!("{label} is not a finite number")));
            }
        }
        Ok(Self { ptv, gtv, eiv_5mm_t })
    }

    /// Parse a query from raw text fields.
    ///
    /// Every field must be present; the whole query is rejected on the first
    /// missing or malformed value.
    ///
    /// # Errors
    /// Returns `InvalidInput` naming the offending field.
    pub fn parse(ptv: &str, gtv: &str, eiv_5mm_t: &str) -> Result<Self, AnalyzerError> {
        let ptv = parse_field("PTV", ptv)?;
        let gtv = parse_field("GTV", gtv)?;
        let eiv_5mm_t = parse_field("EIV_5mm_t", eiv_5mm_t)?;
        Self::new(ptv, gtv, eiv_5mm_t)
    }

    /// Vector order used by every distance metric: PTV, GTV, EIV_5mm_t.
    #[must_use]
    pub fn to_array(&self) -> [f64; 3] {
        [self.ptv, self.gtv, self.eiv_5mm_t]
    }
}

fn parse_field(label: &str, raw: &str) -> Result<f64, AnalyzerError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AnalyzerError::InvalidInput(format!("{label}: value is missing")));
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| AnalyzerError::InvalidInput(format!("{label}: invalid number")))
}

/// Column labels of the query fields, in form order.
pub const QUERY_FIELD_NAMES: [&str; 3] = ["GTV", "PTV", "EIV_5mm_t"];
