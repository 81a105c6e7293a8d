//! Predicted dosimetric outcomes and the regression calibration behind them.

use serde::{Deserialize, Serialize};

/// Whether an outcome is an absolute volume or a coverage percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    /// cm3, clamped to a minimum of 0
    Volume,
    /// %, clamped to a maximum of 100
    Percentage,
}

/// The six predicted outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeKey {
    PtvV40gPct,
    PtvNonV40gCm3,
    GtvV47gPct,
    GtvNonV47gCm3,
    GtvV50gPct,
    PtvV35Pct,
}

impl OutcomeKey {
    /// All outcomes, in display order.
    pub const ALL: [OutcomeKey; 6] = [
        Self::PtvV40gPct,
        Self::PtvNonV40gCm3,
        Self::GtvV47gPct,
        Self::GtvNonV47gCm3,
        Self::GtvV50gPct,
        Self::PtvV35Pct,
    ];

    /// Column label used in the dataset and the UI.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::PtvV40gPct => "PTV V40G %",
            Self::PtvNonV40gCm3 => "PTV nonV40G cm3",
            Self::GtvV47gPct => "GTV V47G %",
            Self::GtvNonV47gCm3 => "GTV nonV47G cm3",
            Self::GtvV50gPct => "GTV V50G %",
            Self::PtvV35Pct => "PTV V35 %",
        }
    }

    #[must_use]
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::PtvNonV40gCm3 | Self::GtvNonV47gCm3 => OutcomeKind::Volume,
            _ => OutcomeKind::Percentage,
        }
    }

    /// Clamp a raw regression value into the plausible range for this outcome.
    #[must_use]
    pub fn clamp(&self, raw: f64) -> f64 {
        match self.kind() {
            OutcomeKind::Volume => raw.max(0.0),
            OutcomeKind::Percentage => raw.min(100.0),
        }
    }
}

impl std::fmt::Display for OutcomeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Six predicted values, in [`OutcomeKey::ALL`] order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSet {
    entries: Vec<(OutcomeKey, f64)>,
}

impl PredictionSet {
    /// Build a set from exactly one value per outcome.
    #[must_use]
    pub fn from_values(values: [f64; 6]) -> Self {
        Self {
            entries: OutcomeKey::ALL.into_iter().zip(values).collect(),
        }
    }

    /// Value of a single outcome.
    #[must_use]
    pub fn get(&self, key: OutcomeKey) -> f64 {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(f64::NAN, |(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (OutcomeKey, f64)> + '_ {
        self.entries.iter().copied()
    }
}

/// Linear coefficients of one regression equation over
/// `{gtv, ptv, eic, pg, pg12}` plus an intercept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTerm {
    pub gtv: f64,
    pub ptv: f64,
    pub eic: f64,
    pub pg: f64,
    pub pg12: f64,
    pub intercept: f64,
}

impl LinearTerm {
    const ZERO: Self = Self {
        gtv: 0.0,
        ptv: 0.0,
        eic: 0.0,
        pg: 0.0,
        pg12: 0.0,
        intercept: 0.0,
    };

    #[must_use]
    pub fn eval(&self, gtv: f64, ptv: f64, eic: f64, pg: f64, pg12: f64) -> f64 {
        self.gtv * gtv + self.ptv * ptv + self.eic * eic + self.pg * pg + self.pg12 * pg12 + self.intercept
    }
}

/// Regression calibration for the six outcomes.
///
/// `PTV V40G %` additionally depends on the clamped `PTV nonV40G cm3` and
/// `GTV V47G %` predictions, and `PTV V35 %` on the clamped `PTV V40G %`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Offset added to `gtv / ptv` before raising to the 12th power.
    pub pg_offset: f64,
    pub gtv_non_v47g: LinearTerm,
    pub ptv_non_v40g: LinearTerm,
    pub gtv_v47g: LinearTerm,
    pub gtv_v50g: LinearTerm,
    /// `PTV V40G %` base term, plus weights on the dependent predictions.
    pub ptv_v40g: LinearTerm,
    pub ptv_v40g_from_ptv_non_v40g: f64,
    pub ptv_v40g_from_gtv_v47g: f64,
    /// `PTV V35 %` base term, plus weight on the `PTV V40G %` prediction.
    pub ptv_v35: LinearTerm,
    pub ptv_v35_from_ptv_v40g: f64,
}

impl Calibration {
    /// The calibration shipped with the analyzer. This is the only coefficient
    /// set in use; changing it requires clinical sign-off.
    pub const PANCREAS_SBRT: Self = Self {
        pg_offset: 0.5,
        gtv_non_v47g: LinearTerm {
            gtv: -0.09,
            ptv: 0.065,
            eic: 0.25,
            pg: -2.15,
            pg12: 0.43,
            intercept: -1.86,
        },
        ptv_non_v40g: LinearTerm {
            gtv: -0.15,
            ptv: 0.15,
            eic: 0.3,
            intercept: -3.92,
            ..LinearTerm::ZERO
        },
        gtv_v47g: LinearTerm {
            eic: -0.42,
            pg: -5.64,
            intercept: 104.0,
            ..LinearTerm::ZERO
        },
        gtv_v50g: LinearTerm {
            eic: -0.69,
            pg: -15.65,
            intercept: 106.7,
            ..LinearTerm::ZERO
        },
        ptv_v40g: LinearTerm {
            eic: -1.05,
            intercept: 257.25,
            ..LinearTerm::ZERO
        },
        ptv_v40g_from_ptv_non_v40g: 0.11,
        ptv_v40g_from_gtv_v47g: -1.57,
        ptv_v35: LinearTerm {
            eic: 0.005,
            intercept: 56.4,
            ..LinearTerm::ZERO
        },
        ptv_v35_from_ptv_v40g: 0.44,
    };
}

impl Default for Calibration {
    fn default() -> Self {
        Self::PANCREAS_SBRT
    }
}
