//! Result normalizer.
//!
//! Turns whatever the active upstream returned into exactly one
//! [`RiskResult`]. Nothing in here returns an error to its caller except
//! [`validate_against_schema`]; every failure path is folded into an error
//! result through [`to_error_result`].

use crate::error::PredictionError;
use crate::output_schema::{OutputSchema, SchemaError};
use crate::prediction::RawPrediction;
use crate::types::RiskResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Label mapping for flat probability vectors.
///
/// The served models were trained with class 1 = high risk, but nothing in
/// their responses says so. Keep this configurable and watch the warning
/// emitted for vectors with more than two classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryLabels {
    #[serde(default = "default_positive_index")]
    pub positive_index: usize,

    #[serde(default = "default_positive_label")]
    pub positive_label: String,

    #[serde(default = "default_negative_label")]
    pub negative_label: String,
}

fn default_positive_index() -> usize {
    1
}

fn default_positive_label() -> String {
    "High Risk".to_string()
}

fn default_negative_label() -> String {
    "Low Risk".to_string()
}

impl Default for BinaryLabels {
    fn default() -> Self {
        Self {
            positive_index: default_positive_index(),
            positive_label: default_positive_label(),
            negative_label: default_negative_label(),
        }
    }
}

impl BinaryLabels {
    pub fn label_for(&self, index: usize) -> &str {
        if index == self.positive_index {
            &self.positive_label
        } else {
            &self.negative_label
        }
    }
}

/// Index and value of the largest element, first occurrence on ties.
///
/// Returns `None` for an empty slice or when any value is not finite.
pub fn arg_max(values: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return None;
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((index, value)),
        }
    }
    best
}

/// Pick the label whose confidence is highest
pub fn normalize_from_confidence_pairs(confidences: &[f64], display_names: &[String]) -> RiskResult {
    try_confidence_pairs(confidences, display_names)
        .unwrap_or_else(|e| error_result_from(&e, None))
}

/// Binary class-1-is-high convention with the default labels
pub fn normalize_from_probability_vector(predictions: &[f64]) -> RiskResult {
    normalize_from_probability_vector_with(predictions, &BinaryLabels::default())
}

pub fn normalize_from_probability_vector_with(
    predictions: &[f64],
    labels: &BinaryLabels,
) -> RiskResult {
    try_probability_vector(predictions, labels).unwrap_or_else(|e| error_result_from(&e, None))
}

/// Structurally check `raw_json` and pass it through as a result.
///
/// Every field of `schema` is checked, then the canonical result fields, so a
/// narrower custom schema can never let through an object that does not fit
/// [`RiskResult`]. `confidenceScore` is held as `f64`, so an integer score
/// such as `1` comes back out as `1.0`.
pub fn validate_against_schema(
    raw_json: &Value,
    schema: &OutputSchema,
) -> Result<RiskResult, SchemaError> {
    schema.check(raw_json)?;
    if *schema != OutputSchema::risk_result() {
        OutputSchema::risk_result().check(raw_json)?;
    }
    serde_json::from_value(raw_json.clone()).map_err(|e| SchemaError::Incompatible(e.to_string()))
}

/// Canonical failure value
pub fn to_error_result(message: impl Into<String>, cancer_type: Option<&str>) -> RiskResult {
    RiskResult {
        risk_assessment: String::new(),
        confidence_score: 0.0,
        cancer_type: Some(cancer_type.unwrap_or_default().to_string()),
        error: Some(message.into()),
        extra: Default::default(),
    }
}

pub fn error_result_from(error: &PredictionError, cancer_type: Option<&str>) -> RiskResult {
    to_error_result(error.to_string(), cancer_type)
}

/// Reduce any raw shape to one result, enforcing the success/failure invariant
pub fn normalize(
    raw: RawPrediction,
    schema: &OutputSchema,
    labels: &BinaryLabels,
    cancer_type: Option<&str>,
) -> RiskResult {
    debug!("  Normalizing {} prediction", raw.shape_name());

    let outcome = match raw {
        RawPrediction::ConfidencePairs {
            confidences,
            display_names,
        } => try_confidence_pairs(&confidences, &display_names),
        RawPrediction::ProbabilityVector(predictions) => {
            try_probability_vector(&predictions, labels)
        }
        RawPrediction::Structured(value) => try_structured(&value, schema),
    };

    match outcome {
        Ok(mut result) => {
            if result.cancer_type.is_none() {
                result.cancer_type = cancer_type.map(str::to_string);
            }
            result
        }
        Err(e) => error_result_from(&e, cancer_type),
    }
}

fn try_confidence_pairs(
    confidences: &[f64],
    display_names: &[String],
) -> Result<RiskResult, PredictionError> {
    if confidences.is_empty() || display_names.is_empty() {
        return Err(PredictionError::malformed("empty confidences or displayNames"));
    }
    if confidences.len() != display_names.len() {
        return Err(PredictionError::malformed(format!(
            "{} confidences but {} displayNames",
            confidences.len(),
            display_names.len()
        )));
    }

    let (index, score) = arg_max(confidences)
        .ok_or_else(|| PredictionError::malformed("confidences contain a non-finite value"))?;

    Ok(RiskResult::success(display_names[index].clone(), score))
}

fn try_probability_vector(
    predictions: &[f64],
    labels: &BinaryLabels,
) -> Result<RiskResult, PredictionError> {
    if predictions.is_empty() {
        return Err(PredictionError::malformed("empty prediction vector"));
    }
    if predictions.len() > 2 {
        warn!(
            "  Probability vector has {} classes, binary labels only distinguish class {}",
            predictions.len(),
            labels.positive_index
        );
    }

    let (index, score) = arg_max(predictions)
        .ok_or_else(|| PredictionError::malformed("prediction vector contains a non-finite value"))?;

    Ok(RiskResult::success(labels.label_for(index), score))
}

fn try_structured(value: &Value, schema: &OutputSchema) -> Result<RiskResult, PredictionError> {
    let mut result = validate_against_schema(value, schema)?;

    // Upstream flagged its own failure; zero out whatever else it sent.
    // A blank `error` is no failure at all.
    if let Some(message) = result.error.as_deref().filter(|m| !m.trim().is_empty()) {
        return Ok(to_error_result(message, result.cancer_type.as_deref()));
    }
    result.error = None;
    if result.risk_assessment.trim().is_empty() {
        return Err(PredictionError::malformed("empty riskAssessment"));
    }

    Ok(result)
}
