//! Patient source port: Trait for loading the historical dataset.
//!
//! This trait abstracts the data backend (CSV extract) from the application logic.

use crate::domain::PatientRecord;
use crate::AnalyzerError;

/// Trait for reading historical patients.
///
/// Implementations read the whole dataset on every call; the application
/// decides when to swap it into the live snapshot.
pub trait PatientSource: Send + Sync {
    /// Load all eligible patients, in source order.
    ///
    /// Rows without an identifier are dropped. Every returned record has
    /// `distance == 0.0`.
    ///
    /// # Errors
    /// Returns `DataUnavailable` if the source does not exist or cannot be read.
    fn load(&self) -> Result<Vec<PatientRecord>, AnalyzerError>;

    /// Human-readable description of where the data comes from.
    fn describe(&self) -> String;
}
