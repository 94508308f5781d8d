//! Grab API handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use sensorr_core::{BlackholeError, GrabTarget};

use super::handlers::ErrorResponse;
use super::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GrabRequest {
    #[serde(flatten)]
    pub target: GrabTarget,
    /// File name, without extension, for the stored release.
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct GrabResponse {
    pub path: String,
}

/// POST /api/v1/grab
///
/// Download a release into the blackhole directory.
pub async fn grab(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<GrabRequest>,
) -> Result<Json<GrabResponse>, (StatusCode, Json<ErrorResponse>)> {
    tracing::debug!(user = %user_id, release = %body.target.title, "Grab requested");

    match state.blackhole().grab(&body.target, &body.name).await {
        Ok(path) => Ok(Json(GrabResponse {
            path: path.display().to_string(),
        })),
        Err(e) => {
            let status = match e {
                BlackholeError::InvalidName(_) => StatusCode::BAD_REQUEST,
                BlackholeError::Fetch(_) => StatusCode::BAD_GATEWAY,
                BlackholeError::Write { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}
