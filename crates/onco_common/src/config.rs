//! Predictor configuration.
//!
//! Which upstream answers a request is decided once, at startup, from the
//! `[predictor]` table of the daemon config. Each variant keeps its own
//! sub-table so switching `kind` never loses the other settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictorKind {
    /// JSON proxy to an HTTP prediction function
    #[default]
    HttpEndpoint,
    /// Generative model prompted with the image
    Prompt,
    /// Cloud ML REST predict call
    MlClient,
    /// Canned cases after a short delay
    Demo,
}

impl PredictorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictorKind::HttpEndpoint => "http_endpoint",
            PredictorKind::Prompt => "prompt",
            PredictorKind::MlClient => "ml_client",
            PredictorKind::Demo => "demo",
        }
    }
}

impl fmt::Display for PredictorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PredictorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "http_endpoint" | "http" => Ok(PredictorKind::HttpEndpoint),
            "prompt" | "prompt_based" => Ok(PredictorKind::Prompt),
            "ml_client" | "ml" => Ok(PredictorKind::MlClient),
            "demo" => Ok(PredictorKind::Demo),
            other => Err(format!("unknown predictor kind '{}'", other)),
        }
    }
}

/// HTTP prediction function settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpEndpointConfig {
    /// Absent until configured; requests fail with a configuration error
    #[serde(default)]
    pub endpoint_url: Option<String>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Generative model settings (Ollama or OpenAI-compatible)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default = "default_prompt_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_prompt_model")]
    pub model: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_prompt_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_prompt_model() -> String {
    "llava:7b".to_string()
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            endpoint: default_prompt_endpoint(),
            model: default_prompt_model(),
            api_key: None,
            timeout_secs: None,
        }
    }
}

/// Cloud ML endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlClientConfig {
    #[serde(default = "default_ml_project")]
    pub project: String,

    #[serde(default = "default_ml_location")]
    pub location: String,

    #[serde(default)]
    pub endpoint_id: Option<String>,

    /// Overrides `https://{location}-aiplatform.googleapis.com`
    #[serde(default)]
    pub api_endpoint: Option<String>,

    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_ml_project() -> String {
    "oncodetect-ai".to_string()
}

fn default_ml_location() -> String {
    "us-central1".to_string()
}

impl Default for MlClientConfig {
    fn default() -> Self {
        Self {
            project: default_ml_project(),
            location: default_ml_location(),
            endpoint_id: None,
            api_endpoint: None,
            access_token: None,
            timeout_secs: None,
        }
    }
}

impl MlClientConfig {
    pub fn base_url(&self) -> String {
        match &self.api_endpoint {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", self.location),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Simulated analysis time
    #[serde(default = "default_demo_delay")]
    pub delay_ms: u64,
}

fn default_demo_delay() -> u64 {
    1_500
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_demo_delay(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictorConfig {
    #[serde(default)]
    pub kind: PredictorKind,

    #[serde(default)]
    pub http: HttpEndpointConfig,

    #[serde(default)]
    pub prompt: PromptConfig,

    #[serde(default)]
    pub ml_client: MlClientConfig,

    #[serde(default)]
    pub demo: DemoConfig,
}
