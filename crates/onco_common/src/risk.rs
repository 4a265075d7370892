//! Presentation-side reading of a risk assessment label

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse level derived from the open `riskAssessment` vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    Unknown,
}

impl RiskLevel {
    /// Case-insensitive substring match, checked high, medium, low
    pub fn from_assessment(assessment: &str) -> Self {
        let lower = assessment.to_lowercase();
        if lower.contains("high") {
            RiskLevel::High
        } else if lower.contains("medium") {
            RiskLevel::Medium
        } else if lower.contains("low") {
            RiskLevel::Low
        } else {
            RiskLevel::Unknown
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::High => write!(f, "HIGH"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_match_ignores_case() {
        assert_eq!(RiskLevel::from_assessment("High Risk"), RiskLevel::High);
        assert_eq!(RiskLevel::from_assessment("MEDIUM"), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_assessment("low risk"), RiskLevel::Low);
        assert_eq!(RiskLevel::from_assessment("Benign"), RiskLevel::Unknown);
    }

    #[test]
    fn test_high_checked_first() {
        assert_eq!(RiskLevel::from_assessment("High/Low borderline"), RiskLevel::High);
        assert_eq!(RiskLevel::from_assessment("Medium-low"), RiskLevel::Medium);
    }
}
