//! UI hint levels for price impact

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity bucket of a price impact percentage
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// ≤ 5%
    Low,
    /// > 5%
    Medium,
    /// > 10%
    High,
    /// > 20%
    Critical,
}

impl Severity {
    /// Human-readable warning shown next to a trade preview
    pub fn warning(&self) -> &'static str {
        match self {
            Severity::Low => "Low price impact",
            Severity::Medium => "Moderate price impact",
            Severity::High => "High price impact! Consider reducing your trade size",
            Severity::Critical => "Very high price impact! You may lose a significant share of this trade",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        })
    }
}

/// Buckets an impact percentage; NaN is treated as critical
pub fn classify_impact(percent: f64) -> Severity {
    if percent.is_nan() || percent > 20.0 {
        Severity::Critical
    } else if percent > 10.0 {
        Severity::High
    } else if percent > 5.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(classify_impact(0.0), Severity::Low);
        assert_eq!(classify_impact(5.0), Severity::Low);
        assert_eq!(classify_impact(5.01), Severity::Medium);
        assert_eq!(classify_impact(10.0), Severity::Medium);
        assert_eq!(classify_impact(10.5), Severity::High);
        assert_eq!(classify_impact(20.0), Severity::High);
        assert_eq!(classify_impact(20.1), Severity::Critical);
        assert_eq!(classify_impact(100.0), Severity::Critical);
    }

    #[test]
    fn bad_numbers_are_not_low() {
        assert_eq!(classify_impact(f64::NAN), Severity::Critical);
        assert_eq!(classify_impact(f64::INFINITY), Severity::Critical);
    }

    #[test]
    fn ordering_follows_severity() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::High < Severity::Critical);
        assert!(classify_impact(30.0).warning().starts_with("Very high"));
    }
}
