//! Testing utilities and mock implementations.
//!
//! This module provides a mock search backend and fixtures, allowing
//! end-to-end search tests without real indexers.
//!
//! # Example
//!
//! ```rust,ignore
//! use sensorr_core::testing::{fixtures, MockBackend};
//!
//! let backend = MockBackend::new("indexer-a");
//! backend.set_results("Inception", vec![
//!     fixtures::raw_candidate("g1", "Inception.2010.1080p.BluRay", 12),
//! ]).await;
//!
//! // Use in a SearchOrchestrator...
//! ```

mod mock_backend;

pub use mock_backend::{MockBackend, RecordedSearch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::orchestrator::{Movie, ScoredCandidate, WarningLevel};
    use crate::release::parse;
    use crate::searcher::RawCandidate;

    /// Create a raw candidate with reasonable defaults.
    ///
    /// Peers are twice the seeders, size is 1 GiB, no publish date.
    pub fn raw_candidate(guid: &str, title: &str, seeders: u32) -> RawCandidate {
        RawCandidate {
            title: title.to_string(),
            link: format!("http://indexer.test/download/{}", guid),
            guid: guid.to_string(),
            seeders,
            peers: seeders * 2,
            size: 1024 * 1024 * 1024,
            publish_date: None,
        }
    }

    /// Create a valid scored candidate with the given score.
    pub fn scored_candidate(guid: &str, title: &str, seeders: u32, score: f64) -> ScoredCandidate {
        ScoredCandidate {
            candidate: raw_candidate(guid, title, seeders),
            meta: parse(title),
            backend: "mock".to_string(),
            query: title.to_string(),
            score,
            valid: true,
            reason: None,
            warning: WarningLevel::None,
        }
    }

    /// Inception (2010), single title.
    pub fn inception() -> Movie {
        Movie::new("27205", ["Inception"], [2010])
    }
}
