//! Types for the release search backends.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single release as reported by one backend, before any scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    /// Release title, free text.
    pub title: String,
    /// Fetchable URI of the release file.
    pub link: String,
    /// Release identity used for deduplication.
    pub guid: String,
    pub seeders: u32,
    pub peers: u32,
    /// Size in bytes, `0` when unknown.
    pub size: u64,
    /// When the release was published, if the backend said so.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<DateTime<Utc>>,
}

/// Errors that can occur during a backend search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search backend connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Search backend API error: {0}")]
    ApiError(String),

    #[error("Failed to parse backend response: {0}")]
    ParseError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// One configured search source.
///
/// A backend executes a single query and returns whatever it found. It does
/// not retry or enforce a deadline; the orchestrator owns both.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Backend name for logging and result attribution.
    fn name(&self) -> &str;

    /// Search for releases matching `query`.
    async fn search(&self, query: &str) -> Result<Vec<RawCandidate>, SearchError>;
}
