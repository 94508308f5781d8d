//! Release search backends.
//!
//! A [`Backend`] runs one query against one search source. The Torznab
//! client is the only concrete implementation; tests use
//! [`crate::testing::MockBackend`].

mod torznab;
mod types;

pub use torznab::{parse_feed, TorznabBackend};
pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::BackendConfig;

/// Build a backend for every enabled entry of `configs`, in order.
///
/// Entries that cannot be built are logged and skipped.
pub fn build_backends(configs: &[BackendConfig], timeout: Duration) -> Vec<Arc<dyn Backend>> {
    configs
        .iter()
        .filter(|config| !config.disabled)
        .filter_map(|config| match TorznabBackend::new(config.clone(), timeout) {
            Ok(backend) => {
                info!(backend = %config.name, url = %config.url, "Search backend enabled");
                Some(Arc::new(backend) as Arc<dyn Backend>)
            }
            Err(e) => {
                warn!(backend = %config.name, error = %e, "Failed to build search backend");
                None
            }
        })
        .collect()
}
