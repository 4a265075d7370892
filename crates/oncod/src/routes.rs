//! API routes for oncod

use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use onco_common::normalizer::error_result_from;
use onco_common::predictor::evaluate;
use onco_common::upload::{parse_data_uri, MAX_FILE_SIZE};
use onco_common::{HealthResponse, PredictRequest, PredictionError, RiskResult};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

type AppStateArc = Arc<AppState>;

// ============================================================================
// Prediction Routes
// ============================================================================

pub fn predict_routes() -> Router<AppStateArc> {
    Router::new().route("/api/predict", post(predict))
}

async fn predict(
    State(state): State<AppStateArc>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> (StatusCode, Json<RiskResult>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let status = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                StatusCode::PAYLOAD_TOO_LARGE
            } else {
                StatusCode::BAD_REQUEST
            };
            warn!("  Rejected prediction payload: {}", rejection.body_text());
            let error = PredictionError::InvalidRequest(rejection.body_text());
            return (status, Json(error_result_from(&error, None)));
        }
    };

    if let Err(error) = check_image(&request) {
        warn!("  Rejected prediction request: {}", error);
        return (
            StatusCode::BAD_REQUEST,
            Json(error_result_from(&error, request.cancer_type.as_deref())),
        );
    }

    let started = Instant::now();
    let assessment = evaluate(
        state.predictor.as_ref(),
        &request,
        &state.schema,
        &state.labels,
    )
    .await;
    let status =
        StatusCode::from_u16(assessment.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);

    info!(
        "  Prediction via {} -> {} in {}ms",
        state.predictor.kind(),
        status.as_u16(),
        started.elapsed().as_millis()
    );

    (status, Json(assessment.result))
}

/// Reject requests that could never be forwarded
fn check_image(request: &PredictRequest) -> Result<(), PredictionError> {
    if request.image_data_uri.trim().is_empty() {
        return Err(PredictionError::InvalidRequest(
            "Missing imageDataUri.".to_string(),
        ));
    }

    let uri = parse_data_uri(&request.image_data_uri)
        .map_err(|e| PredictionError::InvalidRequest(e.to_string()))?;
    if uri.decoded_len() > MAX_FILE_SIZE {
        return Err(PredictionError::InvalidRequest(format!(
            "Max file size is 5MB (got {} bytes).",
            uri.decoded_len()
        )));
    }

    Ok(())
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        predictor: state.predictor.kind().to_string(),
    })
}
