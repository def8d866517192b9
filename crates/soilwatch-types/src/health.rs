//! Health status categories for NPK readings.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Health category derived from a reading's ZTotal indicator.
///
/// Classification itself lives in soilwatch-core's thresholds module; this
/// enum is the platform-agnostic category shared by the engine and the UI.
///
/// # Ordering
///
/// Categories are ordered from best to worst (`Excellent < Good < Moderate
/// < Bad`), with `Unknown` sorting last. This allows severity comparisons
/// like `if status >= HealthStatus::Moderate { ... }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum HealthStatus {
    /// ZTotal below 1.0.
    Excellent,
    /// ZTotal in [1.0, 1.99].
    Good,
    /// ZTotal in (1.99, 2.99].
    Moderate,
    /// ZTotal above 2.99.
    Bad,
    /// ZTotal missing or not a finite number.
    Unknown,
}

impl HealthStatus {
    /// All categories, in the order the status filter cycles through them.
    pub const ALL: [HealthStatus; 5] = [
        HealthStatus::Excellent,
        HealthStatus::Good,
        HealthStatus::Moderate,
        HealthStatus::Bad,
        HealthStatus::Unknown,
    ];

    /// Get the display label for this category.
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Excellent => "Excellent Health",
            HealthStatus::Good => "Good Health",
            HealthStatus::Moderate => "Moderate Health",
            HealthStatus::Bad => "Bad Health",
            HealthStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_upstream_feed() {
        assert_eq!(HealthStatus::Excellent.to_string(), "Excellent Health");
        assert_eq!(HealthStatus::Good.to_string(), "Good Health");
        assert_eq!(HealthStatus::Moderate.to_string(), "Moderate Health");
        assert_eq!(HealthStatus::Bad.to_string(), "Bad Health");
        assert_eq!(HealthStatus::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(HealthStatus::Excellent < HealthStatus::Good);
        assert!(HealthStatus::Good < HealthStatus::Moderate);
        assert!(HealthStatus::Moderate < HealthStatus::Bad);
    }
}
