//! Progress hooks fired while a search runs.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, info, warn};

use crate::searcher::RawCandidate;

use super::types::ScoredCandidate;

/// Observer of search progress.
///
/// Every method defaults to a no-op. Hooks are side effects only: their
/// outcome never changes the search, and a panicking hook is logged and
/// ignored.
pub trait SearchHooks: Send + Sync {
    /// A backend is about to be queried with `title`.
    fn on_search_start(&self, _backend: &str, _title: &str) {}

    /// A backend call exceeded its deadline. Fires once per timed-out attempt.
    fn on_timeout(&self, _backend: &str, _title: &str) {}

    /// A backend call finished; `results` is empty when it degraded.
    fn on_results_found(&self, _backend: &str, _title: &str, _results: &[RawCandidate]) {}

    /// A candidate went through the validity pipeline.
    fn on_candidate_evaluated(&self, _backend: &str, _title: &str, _candidate: &ScoredCandidate) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl SearchHooks for NoopHooks {}

/// Hooks that log every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHooks;

impl SearchHooks for TracingHooks {
    fn on_search_start(&self, backend: &str, title: &str) {
        debug!(backend = backend, title = title, "Searching");
    }

    fn on_timeout(&self, backend: &str, title: &str) {
        warn!(backend = backend, title = title, "Search timed out");
    }

    fn on_results_found(&self, backend: &str, title: &str, results: &[RawCandidate]) {
        info!(
            backend = backend,
            title = title,
            results = results.len(),
            "Search results found"
        );
    }

    fn on_candidate_evaluated(&self, backend: &str, title: &str, candidate: &ScoredCandidate) {
        debug!(
            backend = backend,
            title = title,
            release = %candidate.candidate.title,
            score = candidate.score,
            valid = candidate.valid,
            reason = candidate.reason.as_deref().unwrap_or(""),
            "Candidate evaluated"
        );
    }
}

/// Invoke a hook, containing any panic it raises.
pub(crate) fn fire(event: &str, f: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(f)).is_err() {
        warn!(event = event, "Search hook panicked; ignoring");
    }
}
