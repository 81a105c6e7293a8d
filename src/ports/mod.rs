//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (data files, report output).

mod report;
mod source;

pub use report::{NeighborReport, PredictionReport, ReportSink};
pub use source::PatientSource;
