//! Report port: Trait for exporting search and prediction results.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DistanceMetric, Neighbor, PredictionSet, QueryTriple};
use crate::AnalyzerError;

/// Result of a neighbour search, ready for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborReport {
    pub generated_at: DateTime<Utc>,
    pub query: QueryTriple,
    pub metric: DistanceMetric,
    pub neighbors: Vec<Neighbor>,
}

/// Result of an outcome prediction, ready for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    pub generated_at: DateTime<Utc>,
    pub query: QueryTriple,
    pub prediction: PredictionSet,
}

/// Trait for persisting reports outside the session.
pub trait ReportSink {
    /// Write a neighbour report, returning where it was written.
    ///
    /// # Errors
    /// Returns error if the report cannot be serialized or written.
    fn write_neighbors(&self, report: &NeighborReport) -> Result<PathBuf, AnalyzerError>;

    /// Write a prediction report, returning where it was written.
    ///
    /// # Errors
    /// Returns error if the report cannot be serialized or written.
    fn write_prediction(&self, report: &PredictionReport) -> Result<PathBuf, AnalyzerError>;
}
