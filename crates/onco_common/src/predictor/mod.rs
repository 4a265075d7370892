//! Predictor abstraction.
//!
//! One trait covers every way of asking a model for a risk assessment: an
//! HTTP prediction function, a generative prompt, a cloud ML predict call, or
//! canned demo cases. The variant is picked from configuration at startup and
//! the normalizer stays the single contract whichever one is active.

mod demo;
mod fake;
mod http_endpoint;
mod ml_client;
mod prompt;

pub use demo::{DemoCase, DemoPredictor, DEMO_CASES};
pub use fake::FakePredictor;
pub use http_endpoint::{upstream_error_message, HttpEndpointPredictor};
pub use ml_client::MlClientPredictor;
pub use prompt::PromptPredictor;

use crate::config::{PredictorConfig, PredictorKind};
use crate::error::PredictionError;
use crate::normalizer::{error_result_from, normalize, BinaryLabels};
use crate::output_schema::OutputSchema;
use crate::prediction::RawPrediction;
use crate::schemas::PredictRequest;
use crate::types::RiskResult;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Anything that can turn an image (plus optional clinical context) into a
/// raw prediction
#[async_trait]
pub trait Predictor: Send + Sync {
    fn kind(&self) -> PredictorKind;

    async fn predict(&self, request: &PredictRequest) -> Result<RawPrediction, PredictionError>;
}

/// Outcome of one request: the result handed to the caller, plus the error
/// that produced it when the upstream call itself failed
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub result: RiskResult,
    pub failure: Option<PredictionError>,
}

impl Assessment {
    /// Status the HTTP layer should answer with
    pub fn status_code(&self) -> u16 {
        match &self.failure {
            Some(e) => e.status_code(),
            None if self.result.is_error() => 502,
            None => 200,
        }
    }
}

/// Run one prediction and normalize it. Never fails: every error becomes an
/// error result carrying the request's cancer type.
pub async fn evaluate(
    predictor: &dyn Predictor,
    request: &PredictRequest,
    schema: &OutputSchema,
    labels: &BinaryLabels,
) -> Assessment {
    let cancer_type = request.cancer_type.as_deref();

    match predictor.predict(request).await {
        Ok(raw) => Assessment {
            result: normalize(raw, schema, labels, cancer_type),
            failure: None,
        },
        Err(e) => {
            warn!("  {} prediction failed ({}): {}", predictor.kind(), e.kind(), e);
            Assessment {
                result: error_result_from(&e, cancer_type),
                failure: Some(e),
            }
        }
    }
}

/// [`evaluate`] without the failure detail
pub async fn assess(
    predictor: &dyn Predictor,
    request: &PredictRequest,
    schema: &OutputSchema,
    labels: &BinaryLabels,
) -> RiskResult {
    evaluate(predictor, request, schema, labels).await.result
}

/// Build the configured predictor variant
pub fn build_predictor(config: &PredictorConfig) -> Result<Arc<dyn Predictor>, PredictionError> {
    info!("  Predictor: {}", config.kind);

    let predictor: Arc<dyn Predictor> = match config.kind {
        PredictorKind::HttpEndpoint => {
            if config.http.endpoint_url.is_none() {
                warn!("  No prediction endpoint URL configured, requests will fail until one is set");
            }
            Arc::new(HttpEndpointPredictor::new(
                config.http.endpoint_url.clone(),
                http_client(config.http.timeout_secs)?,
            ))
        }
        PredictorKind::Prompt => Arc::new(PromptPredictor::new(
            config.prompt.clone(),
            http_client(config.prompt.timeout_secs)?,
        )),
        PredictorKind::MlClient => Arc::new(MlClientPredictor::new(
            config.ml_client.clone(),
            http_client(config.ml_client.timeout_secs)?,
        )),
        PredictorKind::Demo => Arc::new(DemoPredictor::new(Duration::from_millis(
            config.demo.delay_ms,
        ))),
    };

    Ok(predictor)
}

/// Shared reqwest client; without a timeout the library default applies
pub(crate) fn http_client(timeout_secs: Option<u64>) -> Result<reqwest::Client, PredictionError> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| PredictionError::Configuration(format!("Failed to create HTTP client: {}", e)))
}
