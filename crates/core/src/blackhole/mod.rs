//! Blackhole grabs.
//!
//! A grab downloads a release's `.torrent` file into the blackhole
//! directory, where a download client watching it picks it up.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{info, warn};

use crate::metrics;
use crate::orchestrator::GrabTarget;

/// Errors that can occur during a grab.
#[derive(Debug, Error)]
pub enum BlackholeError {
    #[error("Invalid file name: {0:?}")]
    InvalidName(String),

    #[error("Failed to fetch release: {0}")]
    Fetch(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes grabbed releases to a watched directory.
pub struct Blackhole {
    dir: PathBuf,
    client: Client,
}

impl Blackhole {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, BlackholeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| BlackholeError::Fetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            dir: dir.into(),
            client,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Fetch `target.link` and store it as `<dir>/<name>.torrent`.
    pub async fn grab(&self, target: &GrabTarget, name: &str) -> Result<PathBuf, BlackholeError> {
        let result = self.fetch_and_store(target, name).await;

        let label = match &result {
            Ok(_) => "success",
            Err(BlackholeError::InvalidName(_)) => "invalid",
            Err(BlackholeError::Fetch(_)) => "fetch_error",
            Err(BlackholeError::Write { .. }) => "write_error",
        };
        metrics::GRABS_TOTAL.with_label_values(&[label]).inc();

        match &result {
            Ok(path) => info!(release = %target.title, path = %path.display(), "Release grabbed"),
            Err(e) => warn!(release = %target.title, error = %e, "Grab failed"),
        }

        result
    }

    async fn fetch_and_store(
        &self,
        target: &GrabTarget,
        name: &str,
    ) -> Result<PathBuf, BlackholeError> {
        validate_name(name)?;

        let response = self
            .client
            .get(&target.link)
            .send()
            .await
            .map_err(|e| BlackholeError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BlackholeError::Fetch(format!("HTTP {}", response.status())));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| BlackholeError::Fetch(e.to_string()))?;

        self.store(name, &body).await
    }

    /// Write `contents` as `<dir>/<name>.torrent`, creating the directory
    /// if needed.
    pub async fn store(&self, name: &str, contents: &[u8]) -> Result<PathBuf, BlackholeError> {
        validate_name(name)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| BlackholeError::Write {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.dir.join(format!("{}.torrent", name));
        tokio::fs::write(&path, contents)
            .await
            .map_err(|source| BlackholeError::Write {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }
}

/// A name must stay inside the blackhole directory.
fn validate_name(name: &str) -> Result<(), BlackholeError> {
    let invalid = name.trim().is_empty()
        || name.contains(['/', '\\', '\0'])
        || name.contains("..");

    if invalid {
        Err(BlackholeError::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}
