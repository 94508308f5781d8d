//! Mock search backend for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::searcher::{Backend, RawCandidate, SearchError};

/// A recorded search for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedSearch {
    /// The query that was searched.
    pub query: String,
    /// When the search was made.
    pub timestamp: Instant,
}

/// Mock implementation of the Backend trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable results per query
/// - Track queries for assertions, including calls that later time out
/// - Simulate failures and delays
///
/// # Example
///
/// ```rust,ignore
/// use sensorr_core::testing::{MockBackend, fixtures};
///
/// let backend = MockBackend::new("indexer-a");
/// backend.set_results("Inception", vec![
///     fixtures::raw_candidate("g1", "Inception.2010.1080p.BluRay", 12),
/// ]).await;
/// backend.fail_next(1).await;
///
/// // first call fails, the retry succeeds
/// assert_eq!(backend.call_count().await, 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockBackend {
    name: String,
    /// Results keyed by exact query.
    results: Arc<RwLock<HashMap<String, Vec<RawCandidate>>>>,
    /// Recorded search queries.
    searches: Arc<RwLock<Vec<RecordedSearch>>>,
    /// Number of upcoming calls that fail.
    failures: Arc<RwLock<u32>>,
    /// Simulated latency before answering.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockBackend {
    /// Create a mock backend that returns nothing.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            results: Arc::new(RwLock::new(HashMap::new())),
            searches: Arc::new(RwLock::new(Vec::new())),
            failures: Arc::new(RwLock::new(0)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the results returned for `query`.
    pub async fn set_results(&self, query: &str, results: Vec<RawCandidate>) {
        self.results.write().await.insert(query.to_string(), results);
    }

    /// Make the next `count` calls fail with a connection error.
    pub async fn fail_next(&self, count: u32) {
        *self.failures.write().await = count;
    }

    /// Delay every answer by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Get recorded search queries.
    pub async fn recorded_searches(&self) -> Vec<RecordedSearch> {
        self.searches.read().await.clone()
    }

    /// Number of calls made so far.
    pub async fn call_count(&self) -> usize {
        self.searches.read().await.len()
    }

    /// Clear recorded searches.
    pub async fn clear_searches(&self) {
        self.searches.write().await.clear();
    }
}

#[async_trait]
impl Backend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str) -> Result<Vec<RawCandidate>, SearchError> {
        // Record first so calls cancelled by a timeout are still counted.
        self.searches.write().await.push(RecordedSearch {
            query: query.to_string(),
            timestamp: Instant::now(),
        });

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        {
            let mut failures = self.failures.write().await;
            if *failures > 0 {
                *failures -= 1;
                return Err(SearchError::ConnectionFailed(format!(
                    "{}: simulated failure",
                    self.name
                )));
            }
        }

        Ok(self
            .results
            .read()
            .await
            .get(query)
            .cloned()
            .unwrap_or_default())
    }
}
