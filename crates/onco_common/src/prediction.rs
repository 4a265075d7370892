//! Raw upstream prediction shapes.
//!
//! Every upstream answers in its own envelope. [`RawPrediction::from_json`]
//! sorts a response body into one of three shapes the normalizer knows how to
//! reduce to a [`crate::RiskResult`].

use crate::error::PredictionError;
use crate::output_schema::{json_type_name, FieldKind, SchemaError};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum RawPrediction {
    /// Parallel, index-aligned arrays of scores and class labels
    ConfidencePairs {
        confidences: Vec<f64>,
        display_names: Vec<String>,
    },

    /// Flat probability vector, class 1 = high risk by convention
    ProbabilityVector(Vec<f64>),

    /// Arbitrary object checked against an output schema before use
    Structured(Value),
}

impl RawPrediction {
    /// Classify an upstream JSON body
    pub fn from_json(body: Value) -> Result<Self, PredictionError> {
        let object = match body {
            Value::Object(object) => object,
            other => {
                return Err(PredictionError::malformed(format!(
                    "expected a JSON object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        if object.contains_key("confidences") || object.contains_key("displayNames") {
            return confidence_pairs(&object);
        }

        if let Some(predictions) = object.get("predictions") {
            return from_predictions(predictions);
        }

        Ok(RawPrediction::Structured(Value::Object(object)))
    }

    pub fn shape_name(&self) -> &'static str {
        match self {
            RawPrediction::ConfidencePairs { .. } => "confidence_pairs",
            RawPrediction::ProbabilityVector(_) => "probability_vector",
            RawPrediction::Structured(_) => "structured",
        }
    }
}

fn from_predictions(predictions: &Value) -> Result<RawPrediction, PredictionError> {
    let items = predictions.as_array().ok_or_else(|| {
        PredictionError::malformed(format!(
            "'predictions' should be an array, got {}",
            json_type_name(predictions)
        ))
    })?;

    let first = items
        .first()
        .ok_or_else(|| PredictionError::malformed("No predictions found"))?;

    match first {
        // Cloud ML envelope: one object per instance
        Value::Object(instance) => confidence_pairs(instance),
        // Batch of one: [[p0, p1, ...]]
        Value::Array(row) => Ok(RawPrediction::ProbabilityVector(numbers(row, "predictions[0]")?)),
        _ => Ok(RawPrediction::ProbabilityVector(numbers(items, "predictions")?)),
    }
}

fn confidence_pairs(object: &Map<String, Value>) -> Result<RawPrediction, PredictionError> {
    let confidences = object
        .get("confidences")
        .ok_or_else(|| PredictionError::malformed("prediction is missing 'confidences'"))?;
    let display_names = object
        .get("displayNames")
        .ok_or_else(|| PredictionError::malformed("prediction is missing 'displayNames'"))?;

    let confidences = confidences.as_array().ok_or_else(|| not_an_array("confidences", confidences))?;
    let display_names = display_names
        .as_array()
        .ok_or_else(|| not_an_array("displayNames", display_names))?;

    let labels = display_names
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| SchemaError::WrongType {
                    field: format!("displayNames[{}]", i),
                    expected: FieldKind::String,
                    found: json_type_name(v),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RawPrediction::ConfidencePairs {
        confidences: numbers(confidences, "confidences")?,
        display_names: labels,
    })
}

fn numbers(values: &[Value], field: &str) -> Result<Vec<f64>, PredictionError> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_f64().ok_or_else(|| {
                PredictionError::Schema(SchemaError::WrongType {
                    field: format!("{}[{}]", field, i),
                    expected: FieldKind::Number,
                    found: json_type_name(v),
                })
            })
        })
        .collect()
}

fn not_an_array(field: &str, value: &Value) -> PredictionError {
    PredictionError::malformed(format!(
        "'{}' should be an array, got {}",
        field,
        json_type_name(value)
    ))
}
