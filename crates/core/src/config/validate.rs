use std::collections::HashSet;

use reqwest::Url;

use crate::filter::FilterExpression;

use super::{types::Config, AuthMethod, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Auth section exists (enforced by serde)
/// - Basic auth has both credentials
/// - Server port is not 0
/// - Search timeout is positive and min score within [0, 1]
/// - Backends have unique non-empty names and http(s) urls
/// - Filter expression compiles
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.auth.method == AuthMethod::Basic {
        let missing = |v: &Option<String>| v.as_deref().map_or(true, str::is_empty);
        if missing(&config.auth.username) || missing(&config.auth.password) {
            return Err(ConfigError::ValidationError(
                "auth.username and auth.password are required for basic auth".to_string(),
            ));
        }
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.search.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "search.timeout_secs must be greater than 0".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&config.search.min_score) {
        return Err(ConfigError::ValidationError(format!(
            "search.min_score must be between 0 and 1, got {}",
            config.search.min_score
        )));
    }

    let mut names = HashSet::new();
    for backend in &config.backends {
        if backend.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "backend name cannot be empty".to_string(),
            ));
        }
        if !names.insert(backend.name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate backend name: {}",
                backend.name
            )));
        }
        match Url::parse(&backend.url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::ValidationError(format!(
                    "backend {}: unsupported url scheme '{}'",
                    backend.name,
                    url.scheme()
                )))
            }
            Err(e) => {
                return Err(ConfigError::ValidationError(format!(
                    "backend {}: invalid url '{}': {}",
                    backend.name, backend.url, e
                )))
            }
        }
    }

    FilterExpression::parse(&config.filter)
        .map_err(|e| ConfigError::ValidationError(format!("filter: {}", e)))?;

    Ok(())
}
