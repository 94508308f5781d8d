//! Movie search orchestration.
//!
//! The orchestrator queries every backend with every title variant of a
//! movie concurrently, then for each returned release:
//! - parses the release title
//! - scores it against the movie's titles
//! - runs the validity pipeline
//!
//! and keeps the best-scored occurrence of each release.

mod config;
mod dedup;
mod hooks;
mod pipeline;
mod runner;
mod types;

pub use config::SearchSettings;
pub use dedup::ResultSet;
pub use hooks::{NoopHooks, SearchHooks, TracingHooks};
pub use pipeline::{Check, ValidityPipeline};
pub use runner::SearchOrchestrator;
pub use types::{sort_candidates, GrabTarget, Movie, ScoredCandidate, SortKey, WarningLevel};
