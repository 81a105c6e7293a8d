//! Shared handle to the loaded patient collection.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};

use crate::domain::PatientRecord;

/// Immutable view of the dataset as of one load.
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    pub records: Arc<[PatientRecord]>,
    /// When this collection was loaded (`None` before the first load)
    pub loaded_at: Option<DateTime<Utc>>,
}

impl DatasetSnapshot {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for DatasetSnapshot {
    fn default() -> Self {
        Self {
            records: Arc::from(Vec::new()),
            loaded_at: None,
        }
    }
}

/// Holds the current patient collection.
///
/// A reload builds the new collection completely and then swaps it in with a
/// single write, so readers only ever see the old or the new collection.
#[derive(Debug, Default)]
pub struct PatientDataset {
    current: RwLock<DatasetSnapshot>,
}

impl PatientDataset {
    #[must_use]
    pub fn new(records: Vec<PatientRecord>) -> Self {
        Self {
            current: RwLock::new(DatasetSnapshot {
                records: Arc::from(records),
                loaded_at: Some(Utc::now()),
            }),
        }
    }

    /// Clone of the current snapshot. Cheap: the records are shared.
    #[must_use]
    pub fn snapshot(&self) -> DatasetSnapshot {
        // The guarded value is replaced whole, so a poisoned lock still holds a
        // consistent snapshot.
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the whole collection.
    pub fn replace(&self, records: Vec<PatientRecord>) {
        let next = DatasetSnapshot {
            records: Arc::from(records),
            loaded_at: Some(Utc::now()),
        };
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// Drop the collection after a failed load. The snapshot carries no load
    /// time since nothing was loaded.
    pub fn clear(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = DatasetSnapshot::default();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(ids: &[&str]) -> Vec<PatientRecord> {
        ids.iter()
            .map(|id| PatientRecord::new(*id, 1.0, 2.0, 3.0).expect("Should build"))
            .collect()
    }

    #[test]
    fn test_empty_by_default() {
        let dataset = PatientDataset::default();
        assert!(dataset.is_empty());
        assert!(dataset.snapshot().loaded_at.is_none());
    }

    #[test]
    fn test_replace_is_atomic_for_readers() {
        let dataset = PatientDataset::new(records(&["1", "2", "3"]));

        let before = dataset.snapshot();
        dataset.replace(records(&["10", "20"]));
        let after = dataset.snapshot();

        let ids = |s: &DatasetSnapshot| s.records.iter().map(|r| r.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&before), ["1", "2", "3"]);
        assert_eq!(ids(&after), ["10", "20"]);
        assert!(after.loaded_at.is_some());
    }

    #[test]
    fn test_clear_forgets_load_time() {
        let dataset = PatientDataset::new(records(&["1", "2"]));
        dataset.clear();

        let snapshot = dataset.snapshot();
        assert!(snapshot.is_empty());
        assert!(snapshot.loaded_at.is_none());
    }
}
