//! Core data types for OncoDetect

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical, UI-facing outcome of one risk assessment.
///
/// A value is either a success (non-empty `risk_assessment`, no `error`) or a
/// failure (`error` set, assessment empty, score zero). Use
/// [`crate::normalizer::to_error_result`] to build failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResult {
    /// Open vocabulary, conventionally containing "High", "Medium" or "Low"
    pub risk_assessment: String,

    /// Passed through verbatim from upstream, no range check
    pub confidence_score: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancer_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Upstream fields outside the declared schema, kept untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RiskResult {
    /// Build a success value from an assessment label and score
    pub fn success(risk_assessment: impl Into<String>, confidence_score: f64) -> Self {
        Self {
            risk_assessment: risk_assessment.into(),
            confidence_score,
            ..Default::default()
        }
    }

    /// Attach a cancer type label
    pub fn with_cancer_type(mut self, cancer_type: impl Into<String>) -> Self {
        self.cancer_type = Some(cancer_type.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && !self.risk_assessment.is_empty()
    }

    /// Look up an extra upstream field as text (e.g. `diagnosisDetail`)
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_serializes_camel_case() {
        let result = RiskResult::success("High Risk", 0.91).with_cancer_type("Oral Cancer");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "riskAssessment": "High Risk",
                "confidenceScore": 0.91,
                "cancerType": "Oral Cancer"
            })
        );
    }

    #[test]
    fn test_extra_fields_survive_deserialize() {
        let value = json!({
            "riskAssessment": "Low Risk",
            "confidenceScore": 0.99,
            "diagnosisDetail": "No dysplastic changes"
        });
        let result: RiskResult = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(result.extra_str("diagnosisDetail"), Some("No dysplastic changes"));
        assert_eq!(serde_json::to_value(&result).unwrap(), value);
    }

    #[test]
    fn test_success_and_error_predicates() {
        let ok = RiskResult::success("Medium Risk", 0.5);
        assert!(ok.is_success());
        assert!(!ok.is_error());

        let empty = RiskResult::default();
        assert!(!empty.is_success());
        assert!(!empty.is_error());
    }
}
