//! Generative model predictor.
//!
//! Sends the image and clinical context to a multimodal model in JSON mode.
//! Ollama-style endpoints are tried first when the endpoint looks like one,
//! then the OpenAI-compatible chat API.

use super::http_endpoint::upstream_error_message;
use super::Predictor;
use crate::config::{PredictorKind, PromptConfig};
use crate::error::PredictionError;
use crate::prediction::RawPrediction;
use crate::schemas::PredictRequest;
use crate::upload::parse_data_uri;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You review medical images together with clinical data and estimate \
cancer risk. Respond only with a JSON object of the form \
{\"riskAssessment\": \"High Risk\" | \"Medium Risk\" | \"Low Risk\", \
\"confidenceScore\": <number between 0 and 1>, \"explanation\": <short justification>}.";

pub struct PromptPredictor {
    config: PromptConfig,
    client: reqwest::Client,
}

impl PromptPredictor {
    pub fn new(config: PromptConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Check if endpoint is Ollama-style
    fn is_ollama_endpoint(&self) -> bool {
        self.config.endpoint.contains("11434") || self.config.endpoint.contains("ollama")
    }

    async fn call_ollama(&self, prompt: &str, image_base64: &str) -> Result<Value, PredictionError> {
        let url = format!("{}/api/generate", self.config.endpoint.trim_end_matches('/'));

        let request_body = serde_json::json!({
            "model": self.config.model,
            "system": SYSTEM_PROMPT,
            "prompt": prompt,
            "images": [image_base64],
            "stream": false,
            "format": "json",
        });

        let response = self.client.post(&url).json(&request_body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PredictionError::http_status(
                status.as_u16(),
                upstream_error_message(status, &body),
            ));
        }

        let response_json: Value = response.json().await?;
        let text = response_json
            .get("response")
            .and_then(|v| v.as_str())
            .ok_or_else(|| PredictionError::malformed("model returned an empty response"))?;

        parse_model_output(text)
    }

    async fn call_openai_compatible(
        &self,
        prompt: &str,
        image_data_uri: &str,
    ) -> Result<Value, PredictionError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );

        let request_body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": [
                    {"type": "text", "text": prompt},
                    {"type": "image_url", "image_url": {"url": image_data_uri}},
                ]},
            ],
            "response_format": {"type": "json_object"},
        });

        let mut request = self.client.post(&url).json(&request_body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PredictionError::http_status(
                status.as_u16(),
                upstream_error_message(status, &body),
            ));
        }

        let response_json: Value = response.json().await?;
        let text = response_json
            .get("choices")
            .and_then(|v| v.get(0))
            .and_then(|v| v.get("message"))
            .and_then(|v| v.get("content"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| PredictionError::malformed("model returned an empty response"))?;

        parse_model_output(text)
    }
}

#[async_trait]
impl Predictor for PromptPredictor {
    fn kind(&self) -> PredictorKind {
        PredictorKind::Prompt
    }

    async fn predict(&self, request: &PredictRequest) -> Result<RawPrediction, PredictionError> {
        let image = parse_data_uri(&request.image_data_uri)
            .map_err(|e| PredictionError::InvalidRequest(e.to_string()))?;
        let prompt = build_prompt(request);

        if self.is_ollama_endpoint() {
            match self.call_ollama(&prompt, image.base64).await {
                Ok(value) => return Ok(RawPrediction::Structured(value)),
                Err(e) => debug!("  Ollama API failed, trying OpenAI-compatible: {}", e),
            }
        }

        let value = self
            .call_openai_compatible(&prompt, &request.image_data_uri)
            .await?;
        Ok(RawPrediction::Structured(value))
    }
}

/// User prompt listing whatever clinical context was supplied
pub(crate) fn build_prompt(request: &PredictRequest) -> String {
    fn line(label: &str, value: Option<String>) -> String {
        format!("{}: {}\n", label, value.as_deref().unwrap_or("not provided"))
    }

    let mut prompt = String::from(
        "Analyze the attached medical image and the clinical data below, then give a cancer \
         risk assessment and a confidence score.\n\n",
    );
    prompt.push_str(&line("Cancer type", request.cancer_type.clone()));
    prompt.push_str(&line("Image type", request.image_type.clone()));
    prompt.push_str(&line("Age", request.age.map(|a| a.to_string())));
    prompt.push_str(&line("Gender", request.gender.clone()));
    prompt.push_str(&line("Smoking status", request.smoking_status.clone()));
    if !request.has_clinical_context() {
        prompt.push_str("\nNo patient data was supplied. Base the assessment on the image alone.\n");
    }
    prompt
}

fn parse_model_output(text: &str) -> Result<Value, PredictionError> {
    serde_json::from_str(text)
        .map_err(|e| PredictionError::malformed(format!("model output is not valid JSON: {}", e)))
}
