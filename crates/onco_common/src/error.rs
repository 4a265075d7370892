//! Error taxonomy for one prediction request.
//!
//! None of these are fatal. Each is scoped to a single request and reaches
//! the caller as data through [`crate::normalizer::to_error_result`].

use crate::output_schema::SchemaError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    /// Required endpoint or setting missing
    #[error("{0}")]
    Configuration(String),

    /// Upstream unreachable, answered with a non-success status, or reported
    /// its own failure
    #[error("{}", network_message(*status, message))]
    Network { status: Option<u16>, message: String },

    /// Response lacks expected fields or breaks array-length invariants
    #[error("Malformed response from prediction service: {0}")]
    MalformedUpstreamShape(String),

    /// Response fields present but of the wrong type
    #[error("Invalid response from prediction service: {0}")]
    Schema(#[from] SchemaError),

    /// Caller sent something the service cannot forward
    #[error("Invalid request payload. {0}")]
    InvalidRequest(String),
}

fn network_message(status: Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Prediction service returned HTTP {}: {}", code, message),
        None => format!("Prediction service error: {}", message),
    }
}

impl PredictionError {
    pub fn network(message: impl Into<String>) -> Self {
        PredictionError::Network {
            status: None,
            message: message.into(),
        }
    }

    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        PredictionError::Network {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        PredictionError::MalformedUpstreamShape(message.into())
    }

    /// Short machine-readable kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::Configuration(_) => "configuration",
            PredictionError::Network { .. } => "network",
            PredictionError::MalformedUpstreamShape(_) => "malformed_upstream_shape",
            PredictionError::Schema(_) => "schema",
            PredictionError::InvalidRequest(_) => "invalid_request",
        }
    }

    /// HTTP status the service answers with when this error ends a request
    pub fn status_code(&self) -> u16 {
        match self {
            PredictionError::Configuration(_) => 500,
            PredictionError::Network {
                status: Some(code), ..
            } if (400..600).contains(code) => *code,
            PredictionError::Network { .. } => 502,
            PredictionError::MalformedUpstreamShape(_) | PredictionError::Schema(_) => 502,
            PredictionError::InvalidRequest(_) => 400,
        }
    }
}

impl From<reqwest::Error> for PredictionError {
    fn from(e: reqwest::Error) -> Self {
        let status = e.status().map(|s| s.as_u16());
        let message = if e.is_timeout() {
            "request timed out".to_string()
        } else if e.is_connect() {
            format!("connection failed: {}", e)
        } else if e.is_decode() {
            return PredictionError::malformed(format!("response body is not valid JSON: {}", e));
        } else {
            e.to_string()
        };
        PredictionError::Network { status, message }
    }
}
