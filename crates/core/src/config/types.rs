use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::orchestrator::{SearchSettings, SortKey};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    /// Directory grabbed `.torrent` files are written to.
    #[serde(default = "default_blackhole")]
    pub blackhole: PathBuf,
    /// Filter expression every release must match to stay valid.
    #[serde(default)]
    pub filter: String,
    /// Ordering of search results.
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub descending: bool,
    #[serde(default)]
    pub search: SearchSettings,
    /// Search backends, queried in this order.
    #[serde(default)]
    pub backends: Vec<BackendConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    7000
}

fn default_blackhole() -> PathBuf {
    PathBuf::from("/tmp")
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub method: AuthMethod,
    /// Required when `method = "basic"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Required when `method = "basic"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl AuthConfig {
    pub fn none() -> Self {
        Self {
            method: AuthMethod::None,
            username: None,
            password: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    None,
    Basic,
}

impl AuthMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthMethod::None => "none",
            AuthMethod::Basic => "basic",
        }
    }
}

/// A Torznab search backend
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct BackendConfig {
    /// Name used in logs and results
    pub name: String,
    /// Torznab endpoint (e.g., "http://localhost:9117/api/v2.0/indexers/all/results/torznab")
    pub url: String,
    #[serde(default, alias = "key")]
    pub api_key: String,
    /// Disabled backends are never queried
    #[serde(default)]
    pub disabled: bool,
    /// Torznab category ids to restrict searches to (e.g., 2000 for movies)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<u32>,
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub auth: SanitizedAuthConfig,
    pub server: ServerConfig,
    pub blackhole: PathBuf,
    pub filter: String,
    pub sort: SortKey,
    pub descending: bool,
    pub search: SearchSettings,
    pub backends: Vec<SanitizedBackendConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAuthConfig {
    pub method: String,
    pub credentials_configured: bool,
}

/// Sanitized backend config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedBackendConfig {
    pub name: String,
    pub url: String,
    pub api_key_configured: bool,
    pub disabled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<u32>,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            auth: SanitizedAuthConfig {
                method: config.auth.method.as_str().to_string(),
                credentials_configured: config.auth.username.is_some()
                    && config.auth.password.is_some(),
            },
            server: config.server.clone(),
            blackhole: config.blackhole.clone(),
            filter: config.filter.clone(),
            sort: config.sort,
            descending: config.descending,
            search: config.search.clone(),
            backends: config
                .backends
                .iter()
                .map(|b| SanitizedBackendConfig {
                    name: b.name.clone(),
                    url: b.url.clone(),
                    api_key_configured: !b.api_key.is_empty(),
                    disabled: b.disabled,
                    categories: b.categories.clone(),
                })
                .collect(),
        }
    }
}
