//! Search API handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use sensorr_core::{sort_candidates, Movie, ScoredCandidate, TracingHooks};
use tracing::info;

use super::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub movie: Movie,
    /// Drop invalid releases from the results.
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<ScoredCandidate>,
    pub duration_ms: u64,
}

/// POST /api/v1/search
///
/// Search every backend for every title of the movie. Results are sorted
/// by the configured key and direction.
pub async fn search(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<SearchRequest>,
) -> Json<SearchResponse> {
    let start = Instant::now();

    let mut results = state
        .orchestrator()
        .look(&body.movie, body.strict, &TracingHooks)
        .await;

    let config = state.config();
    sort_candidates(&mut results, config.sort, config.descending);

    let duration_ms = start.elapsed().as_millis() as u64;
    info!(
        user = %user_id,
        movie = body.movie.id(),
        results = results.len(),
        duration_ms,
        "Search served"
    );

    Json(SearchResponse {
        results,
        duration_ms,
    })
}
