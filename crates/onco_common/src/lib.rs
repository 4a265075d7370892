//! OncoDetect Common - Shared types, prediction normalization and predictors.
//!
//! Every upstream answer, whatever its shape, is reduced to a [`RiskResult`]
//! before it reaches a caller.

pub mod config;
pub mod error;
pub mod normalizer;
pub mod output_schema;
pub mod prediction;
pub mod predictor;
pub mod risk;
pub mod schemas;
pub mod types;
pub mod upload;

pub use error::PredictionError;
pub use risk::RiskLevel;
pub use schemas::*;
pub use types::*;
