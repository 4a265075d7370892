//! HTTP server for oncod

use crate::config::Config;
use crate::routes;
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::Router;
use onco_common::normalizer::BinaryLabels;
use onco_common::output_schema::OutputSchema;
use onco_common::predictor::{build_predictor, Predictor};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub predictor: Arc<dyn Predictor>,
    pub schema: OutputSchema,
    pub labels: BinaryLabels,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(predictor: Arc<dyn Predictor>, labels: BinaryLabels) -> Self {
        Self {
            predictor,
            schema: OutputSchema::risk_result(),
            labels,
            start_time: Instant::now(),
        }
    }
}

/// Full router with CORS, body limit and request tracing
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .merge(routes::predict_routes())
        .merge(routes::health_routes())
        .with_state(Arc::new(state))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until Ctrl-C
pub async fn run(config: Config) -> Result<()> {
    let predictor = build_predictor(&config.predictor)?;
    let state = AppState::new(predictor, config.labels.clone());
    let app = router(state, config.server.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    info!("  Listening on http://{}", config.server.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
