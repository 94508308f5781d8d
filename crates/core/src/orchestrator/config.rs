//! Search settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::release::ParserDefaults;

/// Tunables for one search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Deadline for each backend call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts after a failed or timed-out backend call.
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Candidates scoring below this similarity are disqualified.
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// Fallbacks for fields the release parser cannot recognise.
    #[serde(default)]
    pub parser: ParserDefaults,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_retries() -> u32 {
    1
}

fn default_min_score() -> f64 {
    0.6
}

impl SearchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
            min_score: default_min_score(),
            parser: ParserDefaults::default(),
        }
    }
}
