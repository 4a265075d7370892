//! HTTP client for communicating with oncod.

use crate::errors::CtlError;
use onco_common::{HealthResponse, PredictRequest, RiskResult};
use serde::de::DeserializeOwned;

/// Daemon address when neither `--server` nor `$ONCOCTL_SERVER` is set
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:9002";

pub struct OncodClient {
    base_url: String,
    http: reqwest::Client,
}

impl OncodClient {
    pub fn new(base_url: &str) -> Result<Self, CtlError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| CtlError::Other(e.into()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Post one prediction. Error results are returned as results; the
    /// daemon sends them with a non-2xx status.
    pub async fn predict(&self, request: &PredictRequest) -> Result<RiskResult, CtlError> {
        let url = format!("{}/api/predict", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.unavailable(e))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.unavailable(e))?;
        let result: RiskResult = decode(&bytes)?;

        if !status.is_success() && !result.is_error() {
            return Err(CtlError::InvalidResponse(format!(
                "HTTP {} without an error message",
                status.as_u16()
            )));
        }
        Ok(result)
    }

    pub async fn health(&self) -> Result<HealthResponse, CtlError> {
        let url = format!("{}/v1/health", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.unavailable(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CtlError::InvalidResponse(format!("HTTP {}", status.as_u16())));
        }
        let bytes = response.bytes().await.map_err(|e| self.unavailable(e))?;
        decode(&bytes)
    }

    fn unavailable(&self, error: reqwest::Error) -> CtlError {
        CtlError::ServerUnavailable {
            url: self.base_url.clone(),
            message: error.to_string(),
        }
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CtlError> {
    serde_json::from_slice(bytes).map_err(|e| CtlError::InvalidResponse(e.to_string()))
}
