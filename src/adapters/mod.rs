//! Adapters layer: Concrete implementations of ports.
//!
//! - `csv_source`: historical patients from a CSV extract
//! - `report`: JSON reports in the output folder
//! - `workspace`: scratch/output folder preparation
//! - `sanitize`: identifier filtering for logs

pub mod csv_source;
pub mod report;
pub mod sanitize;
pub mod workspace;

pub use csv_source::CsvPatientSource;
pub use report::JsonReportWriter;
