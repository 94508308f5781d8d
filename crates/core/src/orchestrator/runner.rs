//! Search orchestrator implementation.
//!
//! Fans a movie's title variants out across every backend, scores and
//! validates each returned release, then keeps the best occurrence of each
//! release.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::filter::FilterExpression;
use crate::matching;
use crate::metrics;
use crate::release::ReleaseParser;
use crate::searcher::{Backend, RawCandidate, SearchError};

use super::config::SearchSettings;
use super::dedup::ResultSet;
use super::hooks::{fire, SearchHooks};
use super::pipeline::ValidityPipeline;
use super::types::{Movie, ScoredCandidate, WarningLevel};

/// Outcome of a single backend attempt.
enum Attempt {
    Found(Vec<RawCandidate>),
    TimedOut,
    Failed(SearchError),
}

/// The search orchestrator: runs movie searches across all backends.
pub struct SearchOrchestrator {
    backends: Vec<Arc<dyn Backend>>,
    parser: ReleaseParser,
    pipeline: ValidityPipeline,
    settings: SearchSettings,
}

impl SearchOrchestrator {
    /// Create a new orchestrator.
    ///
    /// Backends are queried, and their results merged, in the given order.
    pub fn new(
        backends: Vec<Arc<dyn Backend>>,
        filter: FilterExpression,
        settings: SearchSettings,
    ) -> Self {
        Self {
            backends,
            parser: ReleaseParser::new(settings.parser.clone()),
            pipeline: ValidityPipeline::new(settings.min_score, filter),
            settings,
        }
    }

    pub fn backends(&self) -> &[Arc<dyn Backend>] {
        &self.backends
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn filter(&self) -> &FilterExpression {
        self.pipeline.filter()
    }

    /// Search every backend for every title variant of `movie`.
    ///
    /// Returns one candidate per guid: the highest-scored occurrence, the
    /// first one seen on ties. With `strict`, invalid candidates are dropped
    /// before deduplication. Backend failures degrade to no results.
    pub async fn look(
        &self,
        movie: &Movie,
        strict: bool,
        hooks: &dyn SearchHooks,
    ) -> Vec<ScoredCandidate> {
        if movie.titles().is_empty() || self.backends.is_empty() {
            debug!(
                movie = movie.id(),
                titles = movie.titles().len(),
                backends = self.backends.len(),
                "Nothing to search"
            );
            return Vec::new();
        }

        let start = Instant::now();
        info!(
            movie = movie.id(),
            titles = ?movie.titles(),
            backends = self.backends.len(),
            strict = strict,
            "Starting search"
        );

        let searches = self.backends.iter().flat_map(move |backend| {
            movie
                .titles()
                .iter()
                .map(move |title| self.search_pair(backend.as_ref(), title, movie, strict, hooks))
        });

        let results: ResultSet = join_all(searches).await.into_iter().flatten().collect();
        let results = results.into_vec();

        let elapsed = start.elapsed();
        metrics::SEARCH_DURATION
            .with_label_values(&[if strict { "true" } else { "false" }])
            .observe(elapsed.as_secs_f64());
        metrics::SEARCH_RESULTS
            .with_label_values(&[])
            .observe(results.len() as f64);

        info!(
            movie = movie.id(),
            results = results.len(),
            valid = results.iter().filter(|c| c.valid).count(),
            duration_ms = elapsed.as_millis() as u64,
            "Search complete"
        );

        results
    }

    /// Query one backend with one title and evaluate what comes back.
    async fn search_pair(
        &self,
        backend: &dyn Backend,
        title: &str,
        movie: &Movie,
        strict: bool,
        hooks: &dyn SearchHooks,
    ) -> Vec<ScoredCandidate> {
        let name = backend.name();
        fire("search_start", || hooks.on_search_start(name, title));

        let raw = self.query_with_retry(backend, title, hooks).await;
        fire("results_found", || hooks.on_results_found(name, title, &raw));

        raw.into_iter()
            .map(|candidate| self.evaluate(candidate, name, title, movie))
            .inspect(|scored| {
                fire("candidate_evaluated", || {
                    hooks.on_candidate_evaluated(name, title, scored)
                })
            })
            .filter(|scored| !strict || scored.valid)
            .collect()
    }

    /// Call `backend` under the configured deadline, retrying failures.
    ///
    /// Degrades to an empty list once every attempt has failed.
    async fn query_with_retry(
        &self,
        backend: &dyn Backend,
        title: &str,
        hooks: &dyn SearchHooks,
    ) -> Vec<RawCandidate> {
        let name = backend.name();
        let attempts = self.settings.retries.saturating_add(1);
        let deadline = self.settings.timeout();

        for attempt in 1..=attempts {
            let started = Instant::now();
            let outcome = attempt_once(backend, title, deadline).await;
            metrics::BACKEND_DURATION
                .with_label_values(&[name])
                .observe(started.elapsed().as_secs_f64());

            match outcome {
                Attempt::Found(results) => {
                    metrics::BACKEND_REQUESTS
                        .with_label_values(&[name, "success"])
                        .inc();
                    metrics::BACKEND_RESULTS
                        .with_label_values(&[name])
                        .observe(results.len() as f64);
                    debug!(
                        backend = name,
                        title = title,
                        attempt = attempt,
                        results = results.len(),
                        "Backend call succeeded"
                    );
                    return results;
                }
                Attempt::TimedOut => {
                    metrics::BACKEND_REQUESTS
                        .with_label_values(&[name, "timeout"])
                        .inc();
                    warn!(
                        backend = name,
                        title = title,
                        attempt = attempt,
                        timeout_secs = deadline.as_secs(),
                        "Backend call timed out"
                    );
                    fire("timeout", || hooks.on_timeout(name, title));
                }
                Attempt::Failed(e) => {
                    metrics::BACKEND_REQUESTS
                        .with_label_values(&[name, "error"])
                        .inc();
                    warn!(
                        backend = name,
                        title = title,
                        attempt = attempt,
                        error = %e,
                        "Backend call failed"
                    );
                }
            }
        }

        metrics::BACKEND_REQUESTS
            .with_label_values(&[name, "degraded"])
            .inc();
        warn!(
            backend = name,
            title = title,
            attempts = attempts,
            "Backend gave up, continuing without its results"
        );
        Vec::new()
    }

    /// Parse, score and validate one raw candidate.
    fn evaluate(
        &self,
        candidate: RawCandidate,
        backend: &str,
        query: &str,
        movie: &Movie,
    ) -> ScoredCandidate {
        let meta = self.parser.parse(&candidate.title);
        let score = movie
            .titles()
            .iter()
            .map(|title| matching::score(title, &meta.title))
            .fold(0.0, f64::max);

        let mut scored = ScoredCandidate {
            candidate,
            meta,
            backend: backend.to_string(),
            query: query.to_string(),
            score,
            valid: true,
            reason: None,
            warning: WarningLevel::None,
        };
        self.pipeline.apply(&mut scored, movie);

        let level = u8::from(scored.warning).to_string();
        metrics::CANDIDATES_EVALUATED
            .with_label_values(&[level.as_str()])
            .inc();

        scored
    }
}

async fn attempt_once(backend: &dyn Backend, title: &str, deadline: Duration) -> Attempt {
    match tokio::time::timeout(deadline, backend.search(title)).await {
        Ok(Ok(results)) => Attempt::Found(results),
        Ok(Err(SearchError::Timeout)) | Err(_) => Attempt::TimedOut,
        Ok(Err(e)) => Attempt::Failed(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::hooks::NoopHooks;
    use crate::testing::{fixtures, MockBackend};

    fn orchestrator(backends: Vec<Arc<dyn Backend>>, filter: &str) -> SearchOrchestrator {
        SearchOrchestrator::new(
            backends,
            FilterExpression::compile(filter),
            SearchSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_no_titles_issues_no_calls() {
        let backend = Arc::new(MockBackend::new("a"));
        let orch = orchestrator(vec![backend.clone()], "");
        let movie = Movie::new("1", Vec::<String>::new(), [2010]);

        let results = orch.look(&movie, false, &NoopHooks).await;
        assert!(results.is_empty());
        assert_eq!(backend.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_no_backends() {
        let orch = orchestrator(vec![], "");
        let results = orch.look(&fixtures::inception(), false, &NoopHooks).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_scores_against_best_title_variant() {
        let backend = Arc::new(MockBackend::new("a"));
        backend
            .set_results(
                "Origine",
                vec![fixtures::raw_candidate("g1", "Inception.2010.1080p.BluRay", 10)],
            )
            .await;
        let orch = orchestrator(vec![backend.clone()], "");
        let movie = Movie::new("1", ["Inception", "Origine"], [2010]);

        let results = orch.look(&movie, false, &NoopHooks).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 1.0);
        assert_eq!(results[0].query, "Origine");
        assert_eq!(results[0].backend, "a");
        assert!(results[0].valid);
    }

    #[tokio::test]
    async fn test_strict_drops_invalid() {
        let backend = Arc::new(MockBackend::new("a"));
        backend
            .set_results(
                "Inception",
                vec![
                    fixtures::raw_candidate("good", "Inception.2010.1080p", 10),
                    fixtures::raw_candidate("dead", "Inception.2010.720p", 0),
                ],
            )
            .await;
        let orch = orchestrator(vec![backend.clone()], "");

        let all = orch.look(&fixtures::inception(), false, &NoopHooks).await;
        assert_eq!(all.len(), 2);

        let strict = orch.look(&fixtures::inception(), true, &NoopHooks).await;
        assert_eq!(strict.len(), 1);
        assert_eq!(strict[0].guid(), "good");
    }

    #[tokio::test]
    async fn test_failure_then_success_retries_once() {
        let backend = Arc::new(MockBackend::new("a"));
        backend
            .set_results(
                "Inception",
                vec![fixtures::raw_candidate("g1", "Inception.2010.1080p", 10)],
            )
            .await;
        backend.fail_next(1).await;
        let orch = orchestrator(vec![backend.clone()], "");

        let results = orch.look(&fixtures::inception(), false, &NoopHooks).await;
        assert_eq!(results.len(), 1);
        assert_eq!(backend.call_count().await, 2);
    }

    #[tokio::test]
    async fn test_persistent_failure_degrades_to_empty() {
        let backend = Arc::new(MockBackend::new("a"));
        backend.fail_next(5).await;
        let orch = orchestrator(vec![backend.clone()], "");

        let results = orch.look(&fixtures::inception(), false, &NoopHooks).await;
        assert!(results.is_empty());
        assert_eq!(backend.call_count().await, 2);
    }

    #[tokio::test]
    async fn test_zero_retries_calls_once() {
        let backend = Arc::new(MockBackend::new("a"));
        backend.fail_next(5).await;
        let orch = SearchOrchestrator::new(
            vec![backend.clone()],
            FilterExpression::empty(),
            SearchSettings {
                retries: 0,
                ..SearchSettings::default()
            },
        );

        orch.look(&fixtures::inception(), false, &NoopHooks).await;
        assert_eq!(backend.call_count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_retried_then_degraded() {
        let backend = Arc::new(MockBackend::new("slow"));
        backend.set_delay(Duration::from_secs(60)).await;
        backend
            .set_results(
                "Inception",
                vec![fixtures::raw_candidate("g1", "Inception.2010.1080p", 10)],
            )
            .await;
        let orch = orchestrator(vec![backend.clone()], "");

        let results = orch.look(&fixtures::inception(), false, &NoopHooks).await;
        assert!(results.is_empty());
        assert_eq!(backend.call_count().await, 2);
    }

    #[tokio::test]
    async fn test_candidate_carries_parsed_meta() {
        let backend = Arc::new(MockBackend::new("a"));
        backend
            .set_results(
                "Inception",
                vec![fixtures::raw_candidate(
                    "g1",
                    "Inception.2010.FRENCH.1080p.BluRay.x264-GRP",
                    10,
                )],
            )
            .await;
        let orch = orchestrator(vec![backend.clone()], "");

        let results = orch.look(&fixtures::inception(), false, &NoopHooks).await;
        let meta = &results[0].meta;
        assert_eq!(meta.title, "Inception");
        assert_eq!(meta.language, "FRENCH");
        assert_eq!(meta.resolution, "1080P");
        assert_eq!(meta.group.as_deref(), Some("GRP"));
    }
}
