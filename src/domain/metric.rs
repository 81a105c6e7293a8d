//! Distance metrics between measurement triples.

use serde::{Deserialize, Serialize};

/// Errors raised when a metric is undefined for the given vectors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricError {
    #[error("Canberra distance undefined: dimension {dimension} sums to zero")]
    ZeroDenominator { dimension: usize },

    #[error("Cosine distance undefined for a zero-length vector")]
    ZeroNorm,

    #[error("Unknown distance metric: {0}")]
    Unknown(String),
}

/// Distance metric selected for a neighbour search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceMetric {
    #[default]
    Euclidean,
    Canberra,
    Cosine,
}

impl DistanceMetric {
    /// All metrics, in selector order.
    pub const ALL: [DistanceMetric; 3] = [Self::Euclidean, Self::Canberra, Self::Cosine];

    /// The metric after this one in selector order (wraps around).
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Euclidean => Self::Canberra,
            Self::Canberra => Self::Cosine,
            Self::Cosine => Self::Euclidean,
        }
    }

    /// Distance between two triples. Smaller means more similar.
    ///
    /// # Errors
    /// Canberra fails when `|a_i| + |b_i| == 0` for some dimension; Cosine
    /// fails when either vector has zero norm.
    pub fn distance(self, a: &[f64; 3], b: &[f64; 3]) -> Result<f64, MetricError> {
        match self {
            Self::Euclidean => Ok(euclidean(a, b)),
            Self::Canberra => canberra(a, b),
            Self::Cosine => cosine(a, b),
        }
    }
}

fn l2_norm(v: &[f64; 3]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

fn euclidean(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

fn canberra(a: &[f64; 3], b: &[f64; 3]) -> Result<f64, MetricError> {
    let mut total = 0.0;
    for (dimension, (x, y)) in a.iter().zip(b).enumerate() {
        let denominator = x.abs() + y.abs();
        if denominator == 0.0 {
            return Err(MetricError::ZeroDenominator { dimension });
        }
        total += (x - y).abs() / denominator;
    }
    Ok(total)
}

fn cosine(a: &[f64; 3], b: &[f64; 3]) -> Result<f64, MetricError> {
    let norms = l2_norm(a) * l2_norm(b);
    if norms == 0.0 {
        return Err(MetricError::ZeroNorm);
    }
    if a == b {
        return Ok(0.0);
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    // Rounding can push the similarity just past +/-1.
    let similarity = (dot / norms).clamp(-1.0, 1.0);
    Ok((1.0 - similarity).max(0.0))
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Euclidean => write!(f, "Euclidean"),
            Self::Canberra => write!(f, "Canberra"),
            Self::Cosine => write!(f, "Cosine"),
        }
    }
}

impl std::str::FromStr for DistanceMetric {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Self::Euclidean),
            "canberra" => Ok(Self::Canberra),
            "cosine" => Ok(Self::Cosine),
            other => Err(MetricError::Unknown(other.to_string())),
        }
    }
}
