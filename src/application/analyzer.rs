//! Analyzer service: Orchestrates loading, ranking and prediction.
//!
//! This service coordinates:
//! - Dataset (re)loading from a patient source
//! - Nearest-neighbour search over the current snapshot
//! - Outcome prediction

use crate::domain::{DistanceMetric, Neighbor, PredictionSet, QueryTriple};
use crate::ports::PatientSource;
use crate::AnalyzerError;

use super::dataset::{DatasetSnapshot, PatientDataset};
use super::prediction::OutcomePredictor;
use super::ranking::NeighborRanker;

/// Service behind every user action of a session.
pub struct AnalyzerService<S>
where
    S: PatientSource,
{
    source: S,
    dataset: PatientDataset,
    ranker: NeighborRanker,
    predictor: OutcomePredictor,
}

impl<S> AnalyzerService<S>
where
    S: PatientSource,
{
    /// Create a service with an empty dataset. Call [`Self::reload`] to load.
    pub fn new(source: S) -> Self {
        Self::with_components(source, NeighborRanker::default(), OutcomePredictor::default())
    }

    pub fn with_components(source: S, ranker: NeighborRanker, predictor: OutcomePredictor) -> Self {
        Self {
            source,
            dataset: PatientDataset::default(),
            ranker,
            predictor,
        }
    }

    /// Reload the dataset from the source, replacing the current collection.
    ///
    /// On failure the dataset is replaced by an empty collection, so later
    /// searches never run against stale rows from a source that went away.
    ///
    /// # Errors
    /// - `DataUnavailable` if the source cannot be read
    /// - `EmptyDataset` if the source has no eligible rows
    pub fn reload(&self) -> Result<usize, AnalyzerError> {
        tracing::info!("Reloading patient data from {}", self.source.describe());

        let records = match self.source.load() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Patient data unavailable, continuing with an empty dataset: {}", e);
                self.dataset.clear();
                return Err(e);
            }
        };

        let count = records.len();
        self.dataset.replace(records);

        if count == 0 {
            tracing::warn!("No eligible patients in {}", self.source.describe());
            return Err(AnalyzerError::EmptyDataset);
        }
        Ok(count)
    }

    /// Find the closest historical patients to `query`.
    ///
    /// # Errors
    /// - `EmptyDataset` if no patients are loaded
    /// - `InvalidInput` if the metric is undefined for the query
    pub fn search(&self, query: &QueryTriple, metric: DistanceMetric) -> Result<Vec<Neighbor>, AnalyzerError> {
        let snapshot = self.dataset.snapshot();
        if snapshot.is_empty() {
            return Err(AnalyzerError::EmptyDataset);
        }

        let neighbors = self.ranker.rank(query, metric, &snapshot.records)?;
        tracing::info!(
            "{} search returned {} of {} patients",
            metric,
            neighbors.len(),
            snapshot.len()
        );
        Ok(neighbors)
    }

    /// Predict outcomes for `query`.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the query is outside the calibration's domain.
    pub fn predict(&self, query: &QueryTriple) -> Result<PredictionSet, AnalyzerError> {
        self.predictor.predict(query)
    }

    #[must_use]
    pub fn snapshot(&self) -> DatasetSnapshot {
        self.dataset.snapshot()
    }

    #[must_use]
    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    #[must_use]
    pub fn neighbor_count(&self) -> usize {
        self.ranker.k()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::CsvPatientSource;
    use crate::domain::PatientRecord;
    use std::sync::Mutex;

    /// Source whose contents can be swapped between reloads.
    struct StubSource {
        rows: Mutex<Option<Vec<PatientRecord>>>,
    }

    impl StubSource {
        fn with(ids: &[&str]) -> Self {
            let rows = ids
                .iter()
                .enumerate()
                .map(|(i, id)| PatientRecord::new(*id, 5.0 + i as f64, 10.0 + i as f64, 2.0).expect("Should build"))
                .collect();
            Self {
                rows: Mutex::new(Some(rows)),
            }
        }

        fn set(&self, rows: Option<Vec<PatientRecord>>) {
            *self.rows.lock().unwrap() = rows;
        }
    }

    impl PatientSource for StubSource {
        fn load(&self) -> Result<Vec<PatientRecord>, AnalyzerError> {
            self.rows
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| AnalyzerError::DataUnavailable("stub".to_string()))
        }

        fn describe(&self) -> String {
            "stub".to_string()
        }
    }

    fn query() -> QueryTriple {
        QueryTriple::new(10.0, 5.0, 2.0).expect("Should build")
    }

    #[test]
    fn test_search_before_reload_is_empty_dataset() {
        let service = AnalyzerService::new(StubSource::with(&["1"]));
        assert!(matches!(
            service.search(&query(), DistanceMetric::Euclidean),
            Err(AnalyzerError::EmptyDataset)
        ));
    }

    #[test]
    fn test_reload_then_search() {
        let service = AnalyzerService::new(StubSource::with(&["1", "2", "3"]));
        assert_eq!(service.reload().expect("Should reload"), 3);

        let neighbors = service
            .search(&query(), DistanceMetric::Euclidean)
            .expect("Should search");
        assert_eq!(neighbors[0].record.id, "1");
        assert_eq!(neighbors[0].distance, 0.0);
        assert!(service.snapshot().records.iter().all(|r| r.distance == 0.0));
    }

    #[test]
    fn test_reload_swaps_whole_collection() {
        let source = StubSource::with(&["old-1", "old-2"]);
        let service = AnalyzerService::new(source);
        service.reload().expect("Should reload");
        let before = service.snapshot();

        service.source.set(Some(
            vec![PatientRecord::new("new-1", 1.0, 1.0, 1.0).expect("Should build")],
        ));
        service.reload().expect("Should reload");
        let after = service.snapshot();

        assert!(before.records.iter().all(|r| r.id.starts_with("old")));
        assert!(after.records.iter().all(|r| r.id.starts_with("new")));
        assert_eq!(after.len(), 1);
    }

    #[test]
    fn test_unavailable_source_empties_dataset() {
        let service = AnalyzerService::new(StubSource::with(&["1"]));
        service.reload().expect("Should reload");
        assert!(service.snapshot().loaded_at.is_some());

        service.source.set(None);
        assert!(matches!(service.reload(), Err(AnalyzerError::DataUnavailable(_))));
        let snapshot = service.snapshot();
        assert!(snapshot.is_empty());
        assert!(snapshot.loaded_at.is_none());
    }

    #[test]
    fn test_no_eligible_rows_is_empty_dataset() {
        let service = AnalyzerService::new(StubSource::with(&[]));
        assert!(matches!(service.reload(), Err(AnalyzerError::EmptyDataset)));
    }

    #[test]
    fn test_csv_end_to_end() {
        let dir = tempfile::tempdir().expect("Should create dir");
        let path = dir.path().join("pancreas_data.csv");
        std::fs::write(&path, "id, PTV, GTV, EIV_5mm_t\n1, 10, 5, 2\n2, 20, 8, 3\n , 1, 1, 1\n")
            .expect("Should write");

        let service = AnalyzerService::new(CsvPatientSource::new(&path));
        assert_eq!(service.reload().expect("Should reload"), 2);

        let neighbors = service
            .search(&query(), DistanceMetric::Euclidean)
            .expect("Should search");
        assert_eq!(neighbors.len(), 2);
        assert_eq!(neighbors[0].record.id, "1");
        assert_eq!(format!("{:.2}", neighbors[1].distance), "10.49");

        let prediction = service.predict(&query()).expect("Should predict");
        assert_eq!(prediction.iter().count(), 6);
    }
}
