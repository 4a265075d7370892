//! Configuration management for oncod.
//!
//! Loads settings from `$ONCOD_CONFIG`, /etc/oncodetect/config.toml or
//! /var/lib/oncodetect/config.toml, otherwise uses defaults. Environment
//! overrides are applied on top once at startup.

use onco_common::config::PredictorConfig;
use onco_common::normalizer::BinaryLabels;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/oncodetect/config.toml";

/// Default config file path for fallback
pub const DEFAULT_CONFIG_PATH: &str = "/var/lib/oncodetect/config.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "ONCOD_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for {var}: {message}")]
    InvalidEnv { var: &'static str, message: String },

    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Largest accepted request body; base64 inflates a 5 MB image to ~6.7 MB
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_bind() -> String {
    "127.0.0.1:9002".to_string()
}

fn default_max_body_bytes() -> usize {
    8 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub predictor: PredictorConfig,

    #[serde(default)]
    pub labels: BinaryLabels,
}

impl Config {
    /// Load config from the first file that parses, or defaults
    pub fn load() -> Self {
        let mut candidates = Vec::new();
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            candidates.push(PathBuf::from(path));
        }
        candidates.push(PathBuf::from(CONFIG_PATH));
        candidates.push(PathBuf::from(DEFAULT_CONFIG_PATH));

        for path in &candidates {
            match Self::load_from_path(path) {
                Ok(config) => return config,
                Err(ConfigError::Read { .. }) => continue,
                Err(e) => warn!("{}", e),
            }
        }

        warn!("Config not found, using defaults");
        Config::default()
    }

    /// Load config from specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides. `lookup` is `std::env::var` in production.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("PREDICTION_API_URL") {
            self.predictor.http.endpoint_url = Some(url);
        }
        if let Some(kind) = get("ONCOD_PREDICTOR") {
            self.predictor.kind = kind.parse().map_err(|message| ConfigError::InvalidEnv {
                var: "ONCOD_PREDICTOR",
                message,
            })?;
        }
        if let Some(bind) = get("ONCOD_BIND") {
            self.server.bind = bind;
        }
        if let Some(project) = get("GCLOUD_PROJECT") {
            self.predictor.ml_client.project = project;
        }
        if let Some(token) = get("ONCOD_ML_ACCESS_TOKEN") {
            self.predictor.ml_client.access_token = Some(token);
        }
        if let Some(endpoint) = get("ONCOD_LLM_ENDPOINT") {
            self.predictor.prompt.endpoint = endpoint;
        }
        if let Some(model) = get("ONCOD_LLM_MODEL") {
            self.predictor.prompt.model = model;
        }
        if let Some(key) = get("ONCOD_LLM_API_KEY") {
            self.predictor.prompt.api_key = Some(key);
        }

        Ok(())
    }

    /// Render as TOML (for `--print-default-config`)
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
