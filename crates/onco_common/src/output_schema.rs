//! Declared output schema for structured upstream responses.
//!
//! Prompt-based and HTTP upstreams hand back an arbitrary JSON object. Before
//! it is trusted as a [`crate::RiskResult`] it is checked field by field
//! against an [`OutputSchema`]: required fields must exist and every declared
//! field that is present must have the declared primitive type.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Primitive JSON type a field must hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
}

impl FieldKind {
    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Number => write!(f, "number"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub fn required(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: true,
        }
    }

    pub fn optional(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: false,
        }
    }
}

/// Structural validation failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("field '{field}' should be a {expected}, got {found}")]
    WrongType {
        field: String,
        expected: FieldKind,
        found: &'static str,
    },

    #[error("object does not fit the result shape: {0}")]
    Incompatible(String),
}

/// Set of fields a structured response must satisfy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSchema {
    pub fields: Vec<FieldSpec>,
}

impl OutputSchema {
    /// Schema of the canonical result shape
    pub fn risk_result() -> Self {
        Self {
            fields: vec![
                FieldSpec::required("riskAssessment", FieldKind::String),
                FieldSpec::required("confidenceScore", FieldKind::Number),
                FieldSpec::optional("cancerType", FieldKind::String),
                FieldSpec::optional("error", FieldKind::String),
            ],
        }
    }

    /// Check `value` against every declared field, first failure wins
    pub fn check(&self, value: &Value) -> Result<(), SchemaError> {
        let object = value
            .as_object()
            .ok_or_else(|| SchemaError::NotAnObject(json_type_name(value)))?;

        for spec in &self.fields {
            match object.get(&spec.name) {
                None if spec.required => {
                    return Err(SchemaError::MissingField(spec.name.clone()));
                }
                None => {}
                // null is a type mismatch, not an absent optional
                Some(field) if !spec.kind.matches(field) => {
                    return Err(SchemaError::WrongType {
                        field: spec.name.clone(),
                        expected: spec.kind,
                        found: json_type_name(field),
                    });
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

impl Default for OutputSchema {
    fn default() -> Self {
        Self::risk_result()
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_minimal_result() {
        let schema = OutputSchema::risk_result();
        assert!(schema
            .check(&json!({"riskAssessment": "Low Risk", "confidenceScore": 0.8}))
            .is_ok());
    }

    #[test]
    fn test_rejects_missing_required() {
        let schema = OutputSchema::risk_result();
        let err = schema.check(&json!({"riskAssessment": "Low Risk"})).unwrap_err();
        assert_eq!(err, SchemaError::MissingField("confidenceScore".to_string()));
    }

    #[test]
    fn test_rejects_wrong_type() {
        let schema = OutputSchema::risk_result();
        let err = schema
            .check(&json!({"riskAssessment": "High", "confidenceScore": "0.9"}))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::WrongType {
                field: "confidenceScore".to_string(),
                expected: FieldKind::Number,
                found: "string",
            }
        );
        assert_eq!(
            err.to_string(),
            "field 'confidenceScore' should be a number, got string"
        );
    }

    #[test]
    fn test_null_optional_is_rejected() {
        let schema = OutputSchema::risk_result();
        let err = schema
            .check(&json!({"riskAssessment": "High", "confidenceScore": 1, "cancerType": null}))
            .unwrap_err();
        assert!(matches!(err, SchemaError::WrongType { found: "null", .. }));
    }

    #[test]
    fn test_rejects_non_object() {
        let schema = OutputSchema::risk_result();
        assert_eq!(
            schema.check(&json!([1, 2])).unwrap_err(),
            SchemaError::NotAnObject("array")
        );
    }
}
