//! Observability HTTP Routes
//!
//! Health check and counter snapshot.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::api::InsightService;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// `/metrics`, nested under `/observability`
pub fn observability_routes(service: Arc<InsightService>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(service)
}

/// `/health` at the root
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (StatusCode::OK, Json(response))
}

async fn metrics_handler(State(service): State<Arc<InsightService>>) -> impl IntoResponse {
    (StatusCode::OK, Json(service.metrics()))
}
