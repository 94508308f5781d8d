//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! with mock search backends and a temporary blackhole directory, so the
//! API can be exercised without indexers or a running server.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use sensorr_core::{
    create_authenticator, load_config_from_str, testing::MockBackend, AuthConfig, Backend,
    Blackhole, FilterExpression, SearchOrchestrator, SortKey,
};
use sensorr_server::{create_router, AppState};

/// Re-export fixtures for test convenience
pub use sensorr_core::testing::fixtures;

/// Test fixture for API testing with mock dependencies.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock backends, in query order
    pub backends: Vec<Arc<MockBackend>>,
    /// Temporary blackhole directory
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Create a new test fixture with default settings.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let mut config =
            load_config_from_str("[auth]\nmethod = \"none\"\n").expect("Failed to build config");
        config.auth = test_config.auth.clone();
        config.blackhole = temp_dir.path().join("blackhole");
        config.filter = test_config.filter.clone();
        config.sort = test_config.sort;
        config.descending = test_config.descending;

        let backends: Vec<Arc<MockBackend>> = test_config
            .backends
            .iter()
            .map(|name| Arc::new(MockBackend::new(name.as_str())))
            .collect();

        let orchestrator = SearchOrchestrator::new(
            backends
                .iter()
                .map(|b| Arc::clone(b) as Arc<dyn Backend>)
                .collect(),
            FilterExpression::compile(&config.filter),
            config.search.clone(),
        );

        let authenticator =
            Arc::from(create_authenticator(&config.auth).expect("Failed to create authenticator"));
        let blackhole = Blackhole::new(&config.blackhole).expect("Failed to create blackhole");

        let state = Arc::new(AppState::new(
            config,
            authenticator,
            Arc::new(orchestrator),
            Arc::new(blackhole),
        ));

        Self {
            router: create_router(state),
            backends,
            temp_dir,
        }
    }

    /// Mock backend at `idx`.
    pub fn backend(&self, idx: usize) -> &MockBackend {
        &self.backends[idx]
    }

    /// Blackhole directory used by the fixture.
    pub fn blackhole_dir(&self) -> PathBuf {
        self.temp_dir.path().join("blackhole")
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body), None).await
    }

    /// Send a GET request with an Authorization header.
    pub async fn get_with_auth(&self, path: &str, authorization: &str) -> TestResponse {
        self.request("GET", path, None, Some(authorization)).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        authorization: Option<&str>,
    ) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        if let Some(value) = authorization {
            request_builder = request_builder.header("Authorization", value);
        }

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub auth: AuthConfig,
    /// Mock backend names, in query order
    pub backends: Vec<String>,
    pub filter: String,
    pub sort: SortKey,
    pub descending: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            auth: AuthConfig::none(),
            backends: vec!["alpha".to_string(), "beta".to_string()],
            filter: String::new(),
            sort: SortKey::Seeders,
            descending: true,
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}
