//! Scripted predictor for tests

use super::Predictor;
use crate::config::PredictorKind;
use crate::error::PredictionError;
use crate::prediction::RawPrediction;
use crate::schemas::PredictRequest;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

/// Returns pre-defined responses in order, repeating the last one
pub struct FakePredictor {
    responses: Mutex<Vec<Result<RawPrediction, PredictionError>>>,
    requests: Mutex<Vec<PredictRequest>>,
}

impl FakePredictor {
    pub fn new(responses: Vec<Result<RawPrediction, PredictionError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn always(raw: RawPrediction) -> Self {
        Self::new(vec![Ok(raw)])
    }

    pub fn always_error(error: PredictionError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Most recent request seen, if any
    pub fn last_request(&self) -> Option<PredictRequest> {
        lock(&self.requests).last().cloned()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Predictor for FakePredictor {
    fn kind(&self) -> PredictorKind {
        PredictorKind::Demo
    }

    async fn predict(&self, request: &PredictRequest) -> Result<RawPrediction, PredictionError> {
        lock(&self.requests).push(request.clone());

        let mut responses = lock(&self.responses);
        match responses.len() {
            0 => Err(PredictionError::malformed("no scripted response")),
            1 => responses[0].clone(),
            _ => responses.remove(0),
        }
    }
}
