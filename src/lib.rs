//! # Pancreas Analyzer
//!
//! Similar-patient lookup and dosimetric outcome prediction for pancreatic
//! tumor geometry.
//!
//! This crate provides:
//! - Loading of historical patients from a CSV extract
//! - Nearest-neighbour ranking under Euclidean, Canberra or Cosine distance
//! - Regression-based prediction of six dosimetric outcomes
//! - Terminal UI for local-only use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (PatientRecord, QueryTriple, metrics, calibration)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (CSV, JSON reports, workspace folders)
//! - `application`: Use cases orchestrating domain and ports
//! - `config`: Settings resolution
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{DistanceMetric, PatientRecord, PredictionSet, QueryTriple};

/// Result type for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Main error type for the analyzer
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("Patient data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No eligible historical patients loaded")]
    EmptyDataset,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

impl From<domain::MetricError> for AnalyzerError {
    fn from(err: domain::MetricError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
