//! Health and metrics endpoints

use super::handlers::ApiState;
use crate::config::ServiceMode;
use crate::metrics::METRICS;
use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde_json::{json, Value};

fn mode_name(mode: ServiceMode) -> &'static str {
    match mode {
        ServiceMode::Mock => "mock",
        ServiceMode::Http => "http",
    }
}

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Tokenholic API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/api/v1/health",
    }))
}

/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "tokenholic",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health/ready
pub async fn readiness_check(State(state): State<ApiState>) -> Json<Value> {
    Json(json!({
        "status": "ready",
        "checks": {
            "services": mode_name(state.services.mode()),
        },
    }))
}

/// GET /health/live
pub async fn liveness_check() -> Json<Value> {
    Json(json!({ "status": "alive" }))
}

/// GET /metrics
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        METRICS.export_prometheus(),
    )
}
