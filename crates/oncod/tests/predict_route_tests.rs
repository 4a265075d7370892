//! Router tests for oncod
//!
//! Drive the full axum router in-process with scripted predictors.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use onco_common::config::PredictorKind;
use onco_common::normalizer::BinaryLabels;
use onco_common::prediction::RawPrediction;
use onco_common::predictor::{DemoPredictor, FakePredictor, Predictor};
use onco_common::{HealthResponse, PredictRequest, PredictionError, RiskResult};
use oncod::server::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const PNG_URI: &str = "data:image/png;base64,iVBORw0KGgo=";

fn app(predictor: Arc<dyn Predictor>) -> Router {
    router(AppState::new(predictor, BinaryLabels::default()), 1024 * 1024)
}

fn post_json(body: String) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Predictor that fails the test if it is ever called
struct Unreachable;

#[async_trait]
impl Predictor for Unreachable {
    fn kind(&self) -> PredictorKind {
        PredictorKind::HttpEndpoint
    }

    async fn predict(&self, _request: &PredictRequest) -> Result<RawPrediction, PredictionError> {
        panic!("predictor must not be called for invalid requests");
    }
}

/// A probability vector comes back as a normalized success
#[tokio::test]
async fn predict_success() {
    let fake = Arc::new(FakePredictor::always(RawPrediction::ProbabilityVector(vec![
        0.3, 0.7,
    ])));
    let body = json!({
        "imageDataUri": PNG_URI,
        "imageType": "Clinical",
        "cancerType": "Oral Cancer",
        "age": 54
    });

    let (status, body) = send(app(fake.clone()), post_json(body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    let result: RiskResult = serde_json::from_value(body).unwrap();
    assert_eq!(
        result,
        RiskResult::success("High Risk", 0.7).with_cancer_type("Oral Cancer")
    );

    let seen = fake.last_request().unwrap();
    assert_eq!(seen.age, Some(54));
    assert_eq!(seen.image_type.as_deref(), Some("Clinical"));
}

/// Upstream status is carried through with an error result
#[tokio::test]
async fn predict_upstream_failure_keeps_status() {
    let fake = Arc::new(FakePredictor::always_error(PredictionError::http_status(
        503,
        "model not loaded",
    )));
    let body = json!({"imageDataUri": PNG_URI, "cancerType": "Cervical Cancer"});

    let (status, body) = send(app(fake), post_json(body.to_string())).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["riskAssessment"], "");
    assert_eq!(body["confidenceScore"], 0.0);
    assert_eq!(body["cancerType"], "Cervical Cancer");
    assert_eq!(
        body["error"],
        "Prediction service returned HTTP 503: model not loaded"
    );
}

/// Missing endpoint configuration is a 500 with the configuration message
#[tokio::test]
async fn predict_configuration_error() {
    let fake = Arc::new(FakePredictor::always_error(PredictionError::Configuration(
        "Server configuration error: Prediction service URL not found.".to_string(),
    )));
    let body = json!({"imageDataUri": PNG_URI});

    let (status, body) = send(app(fake), post_json(body.to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Server configuration error: Prediction service URL not found."
    );
    assert_eq!(body["cancerType"], "");
}

/// A blank upstream `error` field does not turn a real assessment into a failure
#[tokio::test]
async fn predict_blank_upstream_error_is_success() {
    let fake = Arc::new(FakePredictor::always(RawPrediction::Structured(json!({
        "riskAssessment": "Low Risk",
        "confidenceScore": 0.85,
        "error": ""
    }))));
    let body = json!({"imageDataUri": PNG_URI, "cancerType": "Oral Cancer"});

    let (status, body) = send(app(fake), post_json(body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["riskAssessment"], "Low Risk");
    assert_eq!(body["confidenceScore"], 0.85);
    assert!(body.get("error").is_none());
}

/// Mismatched arrays end as a bad gateway, never a panic
#[tokio::test]
async fn predict_malformed_upstream() {
    let fake = Arc::new(FakePredictor::always(RawPrediction::ConfidencePairs {
        confidences: vec![0.4, 0.6],
        display_names: vec!["Low".to_string()],
    }));
    let body = json!({"imageDataUri": PNG_URI});

    let (status, body) = send(app(fake), post_json(body.to_string())).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Malformed response from prediction service"));
}

/// Bad JSON, missing images and non-data URIs are rejected before any upstream call
#[tokio::test]
async fn predict_rejects_invalid_requests() {
    let cases = [
        "{not json".to_string(),
        json!({"cancerType": "Oral Cancer"}).to_string(),
        json!({"imageDataUri": "https://example.com/scan.png"}).to_string(),
        json!({"imageDataUri": "data:image/png;base64,"}).to_string(),
    ];

    for case in cases {
        let (status, body) = send(app(Arc::new(Unreachable)), post_json(case.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "case: {}", case);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request payload."));
        assert_eq!(body["confidenceScore"], 0.0);
    }
}

/// Oversized bodies are refused by the body limit
#[tokio::test]
async fn predict_rejects_oversized_body() {
    let payload = "A".repeat(2 * 1024 * 1024);
    let body = json!({"imageDataUri": format!("data:image/png;base64,{}", payload)});

    let (status, _) = send(app(Arc::new(Unreachable)), post_json(body.to_string())).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

/// Demo predictor answers with one of its canned cases
#[tokio::test]
async fn predict_with_demo_predictor() {
    let demo = Arc::new(DemoPredictor::new(Duration::ZERO));
    let body = json!({"imageDataUri": PNG_URI, "cancerType": "Oral Cancer"});

    let (status, body) = send(app(demo), post_json(body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    let case = DemoPredictor::case_for(PNG_URI);
    assert_eq!(body["riskAssessment"], case.risk_assessment);
    assert_eq!(body["patientName"], case.patient_name);
    assert!(body.get("error").is_none());
}

/// Health reports version and active predictor
#[tokio::test]
async fn health_reports_predictor() {
    let demo = Arc::new(DemoPredictor::new(Duration::ZERO));
    let request = Request::builder()
        .uri("/v1/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(demo), request).await;

    assert_eq!(status, StatusCode::OK);
    let health: HealthResponse = serde_json::from_value(body).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.predictor, "demo");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

/// CORS preflight is answered for any origin
#[tokio::test]
async fn cors_preflight() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/predict")
        .header(header::ORIGIN, "https://clinic.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app(Arc::new(Unreachable)).oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}
