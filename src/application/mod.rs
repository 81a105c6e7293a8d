//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod analyzer;
mod dataset;
mod prediction;
mod ranking;

pub use analyzer::AnalyzerService;
pub use dataset::{DatasetSnapshot, PatientDataset};
pub use prediction::OutcomePredictor;
pub use ranking::{NeighborRanker, DEFAULT_NEIGHBOR_COUNT};
