//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Backend calls (outcome, duration, results)
//! - Candidate verdicts
//! - Whole searches and grabs

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Backends
// =============================================================================

/// Backend call attempts by outcome.
pub static BACKEND_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "sensorr_backend_requests_total",
            "Total search backend call attempts",
        ),
        &["backend", "outcome"], // "success", "timeout", "error", "degraded"
    )
    .unwrap()
});

/// Backend call duration in seconds.
pub static BACKEND_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "sensorr_backend_duration_seconds",
            "Duration of search backend calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["backend"],
    )
    .unwrap()
});

/// Raw results returned per backend call.
pub static BACKEND_RESULTS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "sensorr_backend_results",
            "Number of raw results returned per backend call",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0]),
        &["backend"],
    )
    .unwrap()
});

// =============================================================================
// Searches
// =============================================================================

/// Candidates evaluated by warning level.
pub static CANDIDATES_EVALUATED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "sensorr_candidates_evaluated_total",
            "Total candidates run through the validity pipeline",
        ),
        &["warning"], // "0", "1", "2"
    )
    .unwrap()
});

/// Whole search duration in seconds.
pub static SEARCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("sensorr_search_duration_seconds", "Duration of movie searches")
            .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0]),
        &["strict"],
    )
    .unwrap()
});

/// Releases returned per search, after deduplication.
pub static SEARCH_RESULTS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "sensorr_search_results",
            "Number of releases returned per search",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// Grabs
// =============================================================================

/// Blackhole grabs by result.
pub static GRABS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("sensorr_grabs_total", "Total blackhole grabs"),
        &["result"], // "success", "fetch_error", "write_error", "invalid"
    )
    .unwrap()
});

/// All core metrics, for registration with a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Backends
        Box::new(BACKEND_REQUESTS.clone()),
        Box::new(BACKEND_DURATION.clone()),
        Box::new(BACKEND_RESULTS.clone()),
        // Searches
        Box::new(CANDIDATES_EVALUATED.clone()),
        Box::new(SEARCH_DURATION.clone()),
        Box::new(SEARCH_RESULTS.clone()),
        // Grabs
        Box::new(GRABS_TOTAL.clone()),
    ]
}
