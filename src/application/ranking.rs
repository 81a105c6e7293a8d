//! Nearest-neighbour ranking of historical patients.

use crate::domain::{DistanceMetric, Neighbor, PatientRecord, QueryTriple};
use crate::AnalyzerError;

/// Number of neighbours shown for a search.
pub const DEFAULT_NEIGHBOR_COUNT: usize = 5;

/// Ranks historical patients by distance to a query.
#[derive(Debug, Clone, Copy)]
pub struct NeighborRanker {
    k: usize,
}

impl Default for NeighborRanker {
    fn default() -> Self {
        Self {
            k: DEFAULT_NEIGHBOR_COUNT,
        }
    }
}

impl NeighborRanker {
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Return the `min(k, records.len())` records closest to `query`,
    /// ascending by distance. Records at equal distance keep their input
    /// order.
    ///
    /// Distances are computed for every record before ordering; if the metric
    /// is undefined for any record the whole search fails.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the metric is undefined for the query against
    /// some record (zero Canberra dimension, zero Cosine norm).
    pub fn rank(
        &self,
        query: &QueryTriple,
        metric: DistanceMetric,
        records: &[PatientRecord],
    ) -> Result<Vec<Neighbor>, AnalyzerError> {
        let target = query.to_array();

        let distances = records
            .iter()
            .map(|record| {
                metric.distance(&target, &record.triple()).map_err(|e| {
                    AnalyzerError::InvalidInput(format!("{metric} distance: {e}"))
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        let mut order: Vec<usize> = (0..records.len()).collect();
        // Stable sort: ties keep load order.
        order.sort_by(|&a, &b| distances[a].total_cmp(&distances[b]));
        order.truncate(self.k);

        let neighbors: Vec<Neighbor> = order
            .into_iter()
            .map(|idx| {
                let mut record = records[idx].clone();
                record.distance = distances[idx];
                Neighbor {
                    record,
                    distance: distances[idx],
                }
            })
            .collect();

        if let Some(first) = neighbors.first() {
            tracing::debug!(
                "{} search over {} records, closest id={} at {:.4}",
                metric,
                records.len(),
                first.record.id,
                first.distance
            );
        }

        Ok(neighbors)
    }
}
