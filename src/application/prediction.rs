//! Dosimetric outcome prediction from tumor geometry.

use crate::domain::{Calibration, OutcomeKey, PredictionSet, QueryTriple};
use crate::AnalyzerError;

/// Evaluates the regression calibration for a query.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutcomePredictor {
    calibration: Calibration,
}

impl OutcomePredictor {
    #[must_use]
    pub fn new(calibration: Calibration) -> Self {
        Self { calibration }
    }

    /// Predict the six outcomes for `query`.
    ///
    /// Volumes are clamped to at least 0 and percentages to at most 100
    /// before they feed the dependent equations.
    ///
    /// # Errors
    /// Returns `InvalidInput` if PTV is zero or any intermediate value is not
    /// finite. No partial set is returned.
    pub fn predict(&self, query: &QueryTriple) -> Result<PredictionSet, AnalyzerError> {
        let QueryTriple { ptv, gtv, eiv_5mm_t: eic } = *query;
        let c = &self.calibration;

        if ptv == 0.0 {
            return Err(AnalyzerError::InvalidInput(
                "PTV must be non-zero (GTV/PTV ratio undefined)".to_string(),
            ));
        }
        let pg = gtv / ptv;
        let pg12 = (pg + c.pg_offset).powi(12);
        ensure_finite("GTV/PTV ratio", pg12)?;

        let clamped = |key: OutcomeKey, raw: f64| -> Result<f64, AnalyzerError> {
            ensure_finite(key.label(), raw)?;
            Ok(key.clamp(raw))
        };

        let gtv_non_v47g = clamped(
            OutcomeKey::GtvNonV47gCm3,
            c.gtv_non_v47g.eval(gtv, ptv, eic, pg, pg12),
        )?;
        let ptv_non_v40g = clamped(
            OutcomeKey::PtvNonV40gCm3,
            c.ptv_non_v40g.eval(gtv, ptv, eic, pg, pg12),
        )?;
        let gtv_v47g = clamped(OutcomeKey::GtvV47gPct, c.gtv_v47g.eval(gtv, ptv, eic, pg, pg12))?;
        let gtv_v50g = clamped(OutcomeKey::GtvV50gPct, c.gtv_v50g.eval(gtv, ptv, eic, pg, pg12))?;
        let ptv_v40g = clamped(
            OutcomeKey::PtvV40gPct,
            c.ptv_v40g.eval(gtv, ptv, eic, pg, pg12)
                + c.ptv_v40g_from_ptv_non_v40g * ptv_non_v40g
                + c.ptv_v40g_from_gtv_v47g * gtv_v47g,
        )?;
        let ptv_v35 = clamped(
            OutcomeKey::PtvV35Pct,
            c.ptv_v35.eval(gtv, ptv, eic, pg, pg12) + c.ptv_v35_from_ptv_v40g * ptv_v40g,
        )?;

        tracing::debug!(
            "Predicted outcomes: V40G={:.2}% V47G={:.2}% V50G={:.2}% V35={:.2}%",
            ptv_v40g,
            gtv_v47g,
            gtv_v50g,
            ptv_v35
        );

        // Order must match OutcomeKey::ALL.
        Ok(PredictionSet::from_values([
            ptv_v40g,
            ptv_non_v40g,
            gtv_v47g,
            gtv_non_v47g,
            gtv_v50g,
            ptv_v35,
        ]))
    }
}

fn ensure_finite(label: &str, value: f64) -> Result<(), AnalyzerError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AnalyzerError::InvalidInput(format!("{label} is out of range")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn predict(ptv: f64, gtv: f64, eic: f64) -> Result<PredictionSet, AnalyzerError> {
        let query = QueryTriple::new(ptv, gtv, eic).expect("Should build");
        OutcomePredictor::default().predict(&query)
    }

    #[test]
    fn test_reference_values() {
        // ptv=100, gtv=50, eic=10: pg=0.5, pg12=1
        let set = predict(100.0, 50.0, 10.0).expect("Should predict");

        let gtv_non = -0.09 * 50.0 + 0.065 * 100.0 + 0.25 * 10.0 - 2.15 * 0.5 + 0.43 - 1.86;
        let ptv_non = -0.15 * 50.0 + 0.15 * 100.0 + 0.3 * 10.0 - 3.92;
        let v47 = -0.42 * 10.0 - 5.64 * 0.5 + 104.0;
        let v50 = -0.69 * 10.0 - 15.65 * 0.5 + 106.7;
        let v40 = (-1.05 * 10.0 + 0.11 * ptv_non - 1.57 * v47 + 257.25_f64).min(100.0);
        let v35 = (0.005 * 10.0 + 0.44 * v40 + 56.4_f64).min(100.0);

        assert_abs_diff_eq!(set.get(OutcomeKey::GtvNonV47gCm3), gtv_non, epsilon = 1e-9);
        assert_abs_diff_eq!(set.get(OutcomeKey::PtvNonV40gCm3), ptv_non, epsilon = 1e-9);
        assert_abs_diff_eq!(set.get(OutcomeKey::GtvV47gPct), v47, epsilon = 1e-9);
        assert_abs_diff_eq!(set.get(OutcomeKey::GtvV50gPct), v50, epsilon = 1e-9);
        assert_abs_diff_eq!(set.get(OutcomeKey::PtvV40gPct), v40, epsilon = 1e-9);
        assert_abs_diff_eq!(set.get(OutcomeKey::PtvV35Pct), v35, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_volumes_clamp_to_zero() {
        // Small tumor: both volume regressions go negative.
        let set = predict(10.0, 5.0, 0.0).expect("Should predict");
        assert_eq!(set.get(OutcomeKey::PtvNonV40gCm3), 0.0);
        assert_eq!(set.get(OutcomeKey::GtvNonV47gCm3), 0.0);
    }

    #[test]
    fn test_percentages_clamp_to_hundred() {
        // pg = 0 and eic = 0: V47G raw = 104, V50G raw = 106.7.
        let set = predict(10.0, 0.0, 0.0).expect("Should predict");
        assert_eq!(set.get(OutcomeKey::GtvV47gPct), 100.0);
        assert_eq!(set.get(OutcomeKey::GtvV50gPct), 100.0);
        for (key, value) in set.iter() {
            match key.kind() {
                crate::domain::OutcomeKind::Percentage => assert!(value <= 100.0, "{key}"),
                crate::domain::OutcomeKind::Volume => assert!(value >= 0.0, "{key}"),
            }
        }
    }

    #[test]
    fn test_zero_ptv_is_invalid() {
        assert!(matches!(predict(0.0, 5.0, 2.0), Err(AnalyzerError::InvalidInput(_))));
    }

    #[test]
    fn test_overflowing_ratio_is_invalid() {
        assert!(matches!(predict(1e-300, 1e300, 2.0), Err(AnalyzerError::InvalidInput(_))));
    }

    #[test]
    fn test_all_six_outputs_present() {
        let set = predict(60.0, 20.0, 8.0).expect("Should predict");
        assert_eq!(set.iter().count(), 6);
        assert!(set.iter().all(|(_, v)| v.is_finite()));
    }
}
