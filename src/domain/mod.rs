//! Domain layer: Core clinical types and pure computations.
//!
//! Nothing in here touches the filesystem or the terminal.

mod metric;
mod patient;
mod prediction;

pub use metric::{DistanceMetric, MetricError};
pub use patient::{Neighbor, PatientRecord, QueryTriple, RecordedOutcomes, QUERY_FIELD_NAMES};
pub use prediction::{Calibration, LinearTerm, OutcomeKey, OutcomeKind, PredictionSet};
