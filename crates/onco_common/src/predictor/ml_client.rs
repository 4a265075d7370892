//! Cloud ML endpoint predictor (REST `:predict`)

use super::http_endpoint::upstream_error_message;
use super::Predictor;
use crate::config::{MlClientConfig, PredictorKind};
use crate::error::PredictionError;
use crate::prediction::RawPrediction;
use crate::schemas::PredictRequest;
use crate::upload::parse_data_uri;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, error};

pub struct MlClientPredictor {
    config: MlClientConfig,
    client: reqwest::Client,
}

impl MlClientPredictor {
    pub fn new(config: MlClientConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// `{base}/v1/projects/{project}/locations/{location}/endpoints/{id}:predict`
    pub fn predict_url(&self) -> Result<String, PredictionError> {
        let endpoint_id = self.config.endpoint_id.as_deref().ok_or_else(|| {
            PredictionError::Configuration(
                "Server configuration error: ML endpoint ID not set.".to_string(),
            )
        })?;

        Ok(format!(
            "{}/v1/projects/{}/locations/{}/endpoints/{}:predict",
            self.config.base_url(),
            self.config.project,
            self.config.location,
            endpoint_id
        ))
    }
}

#[async_trait]
impl Predictor for MlClientPredictor {
    fn kind(&self) -> PredictorKind {
        PredictorKind::MlClient
    }

    async fn predict(&self, request: &PredictRequest) -> Result<RawPrediction, PredictionError> {
        let url = self.predict_url()?;
        let image = parse_data_uri(&request.image_data_uri)
            .map_err(|e| PredictionError::InvalidRequest(e.to_string()))?;

        let body = json!({ "instances": [{ "content": image.base64 }] });

        debug!("  Calling ML endpoint {}", url);
        let mut call = self.client.post(&url).json(&body);
        if let Some(token) = &self.config.access_token {
            call = call.bearer_auth(token);
        }

        let response = call.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("  ML endpoint returned {}: {}", status, text);
            return Err(PredictionError::http_status(
                status.as_u16(),
                upstream_error_message(status, &text),
            ));
        }

        let payload: Value = response.json().await?;
        if payload.get("predictions").is_none() {
            return Err(PredictionError::malformed("No predictions found"));
        }
        RawPrediction::from_json(payload)
    }
}
