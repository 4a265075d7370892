//! JSON proxy to an HTTP prediction function

use super::Predictor;
use crate::config::PredictorKind;
use crate::error::PredictionError;
use crate::prediction::RawPrediction;
use crate::schemas::PredictRequest;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, error};

/// Error bodies longer than this are replaced by the status text
const MAX_ERROR_BODY_CHARS: usize = 500;

pub struct HttpEndpointPredictor {
    endpoint_url: Option<String>,
    client: reqwest::Client,
}

impl HttpEndpointPredictor {
    pub fn new(endpoint_url: Option<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint_url,
            client,
        }
    }
}

#[async_trait]
impl Predictor for HttpEndpointPredictor {
    fn kind(&self) -> PredictorKind {
        PredictorKind::HttpEndpoint
    }

    async fn predict(&self, request: &PredictRequest) -> Result<RawPrediction, PredictionError> {
        let url = self.endpoint_url.as_deref().ok_or_else(|| {
            error!("  Prediction endpoint URL is not set");
            PredictionError::Configuration(
                "Server configuration error: Prediction service URL not found.".to_string(),
            )
        })?;

        debug!("  Forwarding prediction request to {}", url);
        let response = self.client.post(url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("  Error from prediction service ({}): {}", status, body);
            return Err(PredictionError::http_status(
                status.as_u16(),
                upstream_error_message(status, &body),
            ));
        }

        let body: Value = response.json().await?;
        if body.get("riskAssessment").is_none() {
            if let Some(message) = body
                .get("error")
                .and_then(|e| e.as_str())
                .filter(|m| !m.trim().is_empty())
            {
                return Err(PredictionError::network(message));
            }
        }

        RawPrediction::from_json(body)
    }
}

/// Best human-readable message from a failed upstream response.
///
/// Prefers a JSON `error` field (string, or an object with `message`), then a
/// short raw body, then the status text.
pub fn upstream_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let message = match json.get("error") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Object(o)) => o.get("message").and_then(|m| m.as_str()).map(str::to_string),
            _ => None,
        };
        if let Some(message) = message {
            return message;
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.chars().count() < MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }

    format!(
        "Error from prediction service: {}",
        status.canonical_reason().unwrap_or(status.as_str())
    )
}
