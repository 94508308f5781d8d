use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use sensorr_core::SanitizedConfig;

use crate::metrics::encode_metrics;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct BackendsResponse {
    pub backends: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

/// GET /api/v1/backends
///
/// Names of the backends searches are sent to, in query order.
pub async fn list_backends(State(state): State<Arc<AppState>>) -> Json<BackendsResponse> {
    let backends = state
        .orchestrator()
        .backends()
        .iter()
        .map(|b| b.name().to_string())
        .collect();
    Json(BackendsResponse { backends })
}

/// GET /metrics
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
