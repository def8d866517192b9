//! ZTotal thresholds and health categorization.
//!
//! # Example
//!
//! ```
//! use soilwatch_core::{HealthThresholds, HealthStatus};
//!
//! let thresholds = HealthThresholds::default();
//! assert_eq!(thresholds.classify(Some(0.4)), HealthStatus::Excellent);
//! assert_eq!(thresholds.classify(None), HealthStatus::Unknown);
//! ```

use serde::{Deserialize, Serialize};

use soilwatch_types::{HealthStatus, Reading};

/// Threshold evaluator mapping ZTotal to a [`HealthStatus`].
///
/// The defaults reproduce the upstream feed's classification rule exactly,
/// including its boundary semantics: `Excellent` ends strictly below
/// `excellent_below`, while `good_max` and `moderate_max` are inclusive
/// upper bounds. A ZTotal of exactly 1.99 is Good, not Moderate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthThresholds {
    /// Exclusive upper bound for Excellent.
    pub excellent_below: f64,
    /// Inclusive upper bound for Good.
    pub good_max: f64,
    /// Inclusive upper bound for Moderate; above is Bad.
    pub moderate_max: f64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            excellent_below: 1.0,
            good_max: 1.99,
            moderate_max: 2.99,
        }
    }
}

impl HealthThresholds {
    /// Classify a ZTotal value.
    ///
    /// Pure and total: every input, including `None`, NaN, and infinities,
    /// maps to exactly one category.
    pub fn classify(&self, ztotal: Option<f64>) -> HealthStatus {
        match ztotal {
            None => HealthStatus::Unknown,
            Some(z) if !z.is_finite() => HealthStatus::Unknown,
            Some(z) if z < self.excellent_below => HealthStatus::Excellent,
            Some(z) if z <= self.good_max => HealthStatus::Good,
            Some(z) if z <= self.moderate_max => HealthStatus::Moderate,
            Some(_) => HealthStatus::Bad,
        }
    }

    /// Classify a reading's ZTotal.
    pub fn classify_reading(&self, reading: &Reading) -> HealthStatus {
        self.classify(reading.ztotal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bands() {
        let t = HealthThresholds::default();
        assert_eq!(t.classify(Some(0.0)), HealthStatus::Excellent);
        assert_eq!(t.classify(Some(1.5)), HealthStatus::Good);
        assert_eq!(t.classify(Some(2.5)), HealthStatus::Moderate);
        assert_eq!(t.classify(Some(3.5)), HealthStatus::Bad);
    }

    #[test]
    fn test_boundary_values_exact() {
        let t = HealthThresholds::default();
        assert_eq!(t.classify(Some(0.999999)), HealthStatus::Excellent);
        assert_eq!(t.classify(Some(1.0)), HealthStatus::Good);
        assert_eq!(t.classify(Some(1.99)), HealthStatus::Good);
        assert_eq!(t.classify(Some(1.990001)), HealthStatus::Moderate);
        assert_eq!(t.classify(Some(2.99)), HealthStatus::Moderate);
        assert_eq!(t.classify(Some(2.990001)), HealthStatus::Bad);
    }

    #[test]
    fn test_classify_is_total() {
        let t = HealthThresholds::default();
        assert_eq!(t.classify(None), HealthStatus::Unknown);
        assert_eq!(t.classify(Some(f64::NAN)), HealthStatus::Unknown);
        assert_eq!(t.classify(Some(f64::INFINITY)), HealthStatus::Unknown);
        assert_eq!(t.classify(Some(f64::NEG_INFINITY)), HealthStatus::Unknown);
        // Out-of-range values are still categorized, never rejected.
        assert_eq!(t.classify(Some(-5.0)), HealthStatus::Excellent);
        assert_eq!(t.classify(Some(1000.0)), HealthStatus::Bad);
    }

    #[test]
    fn test_classify_reading() {
        let t = HealthThresholds::default();
        let reading = Reading {
            ztotal: Some(2.0),
            ..Reading::default()
        };
        assert_eq!(t.classify_reading(&reading), HealthStatus::Moderate);
        assert_eq!(
            t.classify_reading(&Reading::default()),
            HealthStatus::Unknown
        );
    }
}
