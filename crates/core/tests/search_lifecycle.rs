//! Search lifecycle integration tests.
//!
//! These tests drive the orchestrator end to end against mock backends:
//! fan-out -> parse -> score -> validate -> dedup

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{TimeZone, Utc};

use sensorr_core::{
    testing::{fixtures, MockBackend},
    Backend, FilterExpression, Movie, NoopHooks, RawCandidate, ScoredCandidate, SearchHooks,
    SearchOrchestrator, SearchSettings, WarningLevel,
};

/// Test helper holding a set of mock backends.
struct TestHarness {
    backends: Vec<Arc<MockBackend>>,
}

impl TestHarness {
    fn new(names: &[&str]) -> Self {
        Self {
            backends: names.iter().map(|n| Arc::new(MockBackend::new(*n))).collect(),
        }
    }

    fn backend(&self, idx: usize) -> &MockBackend {
        &self.backends[idx]
    }

    fn orchestrator(&self, filter: &str) -> SearchOrchestrator {
        let backends: Vec<Arc<dyn Backend>> = self
            .backends
            .iter()
            .map(|b| b.clone() as Arc<dyn Backend>)
            .collect();
        SearchOrchestrator::new(
            backends,
            FilterExpression::compile(filter),
            SearchSettings::default(),
        )
    }

    async fn total_calls(&self) -> usize {
        let mut total = 0;
        for backend in &self.backends {
            total += backend.call_count().await;
        }
        total
    }
}

fn dated(mut candidate: RawCandidate, year: i32, month: u32, day: u32) -> RawCandidate {
    candidate.publish_date = Some(Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap());
    candidate
}

fn by_guid<'a>(results: &'a [ScoredCandidate], guid: &str) -> &'a ScoredCandidate {
    results
        .iter()
        .find(|c| c.guid() == guid)
        .unwrap_or_else(|| panic!("no result with guid {}", guid))
}

/// Hooks that record every event.
#[derive(Default)]
struct RecordingHooks {
    events: Mutex<Vec<String>>,
}

impl RecordingHooks {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn count(&self, prefix: &str) -> usize {
        self.events().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

impl SearchHooks for RecordingHooks {
    fn on_search_start(&self, backend: &str, title: &str) {
        self.events.lock().unwrap().push(format!("start:{}:{}", backend, title));
    }

    fn on_timeout(&self, backend: &str, title: &str) {
        self.events.lock().unwrap().push(format!("timeout:{}:{}", backend, title));
    }

    fn on_results_found(&self, backend: &str, title: &str, results: &[RawCandidate]) {
        self.events
            .lock()
            .unwrap()
            .push(format!("found:{}:{}:{}", backend, title, results.len()));
    }

    fn on_candidate_evaluated(&self, backend: &str, _title: &str, candidate: &ScoredCandidate) {
        self.events
            .lock()
            .unwrap()
            .push(format!("evaluated:{}:{}", backend, candidate.guid()));
    }
}

/// Hooks that panic on every event.
struct PanickingHooks;

impl SearchHooks for PanickingHooks {
    fn on_search_start(&self, _backend: &str, _title: &str) {
        panic!("start hook");
    }

    fn on_candidate_evaluated(&self, _backend: &str, _title: &str, _candidate: &ScoredCandidate) {
        panic!("evaluated hook");
    }
}

#[tokio::test]
async fn test_valid_release_is_accepted() {
    let harness = TestHarness::new(&["a"]);
    harness
        .backend(0)
        .set_results(
            "Inception",
            vec![dated(
                fixtures::raw_candidate("g1", "Inception.2010.1080p.BluRay", 50),
                2010,
                7,
                16,
            )],
        )
        .await;

    let results = harness
        .orchestrator("")
        .look(&fixtures::inception(), false, &NoopHooks)
        .await;

    assert_eq!(results.len(), 1);
    let c = &results[0];
    assert!(c.valid);
    assert!(c.score >= 0.9);
    assert_eq!(c.warning, WarningLevel::None);
    assert!(c.reason.is_none());
}

#[tokio::test]
async fn test_release_without_seeders_is_rejected() {
    let harness = TestHarness::new(&["a"]);
    harness
        .backend(0)
        .set_results(
            "Inception",
            vec![fixtures::raw_candidate("g1", "Inception.2010.1080p.BluRay", 0)],
        )
        .await;

    let results = harness
        .orchestrator("")
        .look(&fixtures::inception(), false, &NoopHooks)
        .await;

    let c = &results[0];
    assert!(!c.valid);
    assert!(c.reason.as_deref().unwrap().contains("seeders"));
    assert_eq!(c.warning, WarningLevel::Hard);
}

#[tokio::test]
async fn test_release_year_mismatch_is_rejected() {
    let harness = TestHarness::new(&["a"]);
    harness
        .backend(0)
        .set_results(
            "Inception",
            vec![fixtures::raw_candidate("g1", "Inception.1999.1080p", 10)],
        )
        .await;

    let results = harness
        .orchestrator("")
        .look(&fixtures::inception(), false, &NoopHooks)
        .await;

    let c = &results[0];
    assert!(c.score >= 0.95);
    assert!(!c.valid);
    assert!(c.reason.as_deref().unwrap().starts_with("Release year (1999)"));
    assert_eq!(c.warning, WarningLevel::Hard);
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_backend_does_not_abort_search() {
    let harness = TestHarness::new(&["slow", "fast"]);
    harness.backend(0).set_delay(Duration::from_secs(30)).await;
    harness
        .backend(0)
        .set_results(
            "Inception",
            vec![fixtures::raw_candidate("slow-1", "Inception.2010.720p", 10)],
        )
        .await;
    harness
        .backend(1)
        .set_results(
            "Inception",
            vec![fixtures::raw_candidate("fast-1", "Inception.2010.1080p", 10)],
        )
        .await;

    let hooks = RecordingHooks::default();
    let results = harness
        .orchestrator("")
        .look(&fixtures::inception(), false, &hooks)
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].guid(), "fast-1");
    assert_eq!(harness.backend(0).call_count().await, 2);
    assert_eq!(harness.backend(1).call_count().await, 1);
    assert_eq!(hooks.count("timeout:slow:Inception"), 2);
    assert!(hooks.events().contains(&"found:slow:Inception:0".to_string()));
}

#[tokio::test]
async fn test_configured_filter_rejects_softly() {
    let harness = TestHarness::new(&["a"]);
    harness
        .backend(0)
        .set_results(
            "Inception",
            vec![fixtures::raw_candidate("g1", "Inception.2010.FRENCH.1080p.BluRay", 10)],
        )
        .await;

    let results = harness
        .orchestrator("!language=FRENCH")
        .look(&fixtures::inception(), false, &NoopHooks)
        .await;

    let c = &results[0];
    assert!(!c.valid);
    assert_eq!(c.warning, WarningLevel::Soft);
    assert!(c.reason.as_deref().unwrap().contains("!language=FRENCH"));
}

#[tokio::test]
async fn test_tags_before_year_reach_the_filter() {
    let harness = TestHarness::new(&["a"]);
    harness
        .backend(0)
        .set_results(
            "Inception",
            vec![
                fixtures::raw_candidate("french", "Inception.FRENCH.2010.1080p.BluRay.x264-GRP", 10),
                fixtures::raw_candidate("extended", "Inception.EXTENDED.2010.1080p.BluRay", 10),
            ],
        )
        .await;

    let results = harness
        .orchestrator("!language=FRENCH, !flags=EXTENDED")
        .look(&fixtures::inception(), false, &NoopHooks)
        .await;

    for guid in ["french", "extended"] {
        let c = by_guid(&results, guid);
        assert_eq!(c.meta.title, "Inception");
        assert_eq!(c.score, 1.0);
        assert!(!c.valid, "{} should be filtered out", guid);
        assert_eq!(c.warning, WarningLevel::Soft);
    }
}

#[tokio::test]
async fn test_trailing_year_is_checked() {
    let harness = TestHarness::new(&["a"]);
    harness
        .backend(0)
        .set_results(
            "Inception",
            vec![fixtures::raw_candidate("g1", "Inception 1080p BluRay 1999", 10)],
        )
        .await;

    let results = harness
        .orchestrator("")
        .look(&fixtures::inception(), false, &NoopHooks)
        .await;

    let c = &results[0];
    assert_eq!(c.meta.year, 1999);
    assert!(!c.valid);
    assert!(c.reason.as_deref().unwrap().starts_with("Release year (1999)"));
}

#[tokio::test]
async fn test_strict_mode_hides_invalid_releases() {
    let harness = TestHarness::new(&["a"]);
    harness
        .backend(0)
        .set_results(
            "Inception",
            vec![
                fixtures::raw_candidate("valid", "Inception.2010.1080p", 10),
                fixtures::raw_candidate("invalid", "Inception.2010.720p", 0),
            ],
        )
        .await;
    let orchestrator = harness.orchestrator("");

    let lenient = orchestrator
        .look(&fixtures::inception(), false, &NoopHooks)
        .await;
    assert_eq!(lenient.len(), 2);
    assert!(by_guid(&lenient, "valid").valid);
    assert!(!by_guid(&lenient, "invalid").valid);

    let strict = orchestrator
        .look(&fixtures::inception(), true, &NoopHooks)
        .await;
    assert_eq!(strict.len(), 1);
    assert_eq!(strict[0].guid(), "valid");
}

#[tokio::test]
async fn test_every_backend_gets_every_title() {
    let harness = TestHarness::new(&["a", "b", "c"]);
    let movie = Movie::new("1", ["Amélie", "Le Fabuleux Destin d'Amélie Poulain"], [2001]);

    let hooks = RecordingHooks::default();
    harness.orchestrator("").look(&movie, false, &hooks).await;

    assert_eq!(harness.total_calls().await, 6);
    assert_eq!(hooks.count("start:"), 6);
    for backend in &harness.backends {
        let queries: Vec<String> = backend
            .recorded_searches()
            .await
            .into_iter()
            .map(|s| s.query)
            .collect();
        assert_eq!(queries.len(), 2);
        assert!(queries.contains(&"Amélie".to_string()));
        assert!(queries.contains(&"Le Fabuleux Destin d'Amélie Poulain".to_string()));
    }
}

#[tokio::test]
async fn test_dedup_keeps_best_occurrence_across_backends() {
    let harness = TestHarness::new(&["a", "b"]);
    // Same release reported under two titles; the closer one must win.
    harness
        .backend(0)
        .set_results(
            "Inception",
            vec![fixtures::raw_candidate("shared", "Inceptio.2010.1080p", 10)],
        )
        .await;
    harness
        .backend(1)
        .set_results(
            "Inception",
            vec![fixtures::raw_candidate("shared", "Inception.2010.1080p", 10)],
        )
        .await;

    let results = harness
        .orchestrator("")
        .look(&fixtures::inception(), false, &NoopHooks)
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].backend, "b");
    assert_eq!(results[0].score, 1.0);
}

#[tokio::test]
async fn test_dedup_tie_keeps_first_backend() {
    let harness = TestHarness::new(&["a", "b"]);
    for idx in 0..2 {
        harness
            .backend(idx)
            .set_results(
                "Inception",
                vec![fixtures::raw_candidate("shared", "Inception.2010.1080p", 10)],
            )
            .await;
    }

    let results = harness
        .orchestrator("")
        .look(&fixtures::inception(), false, &NoopHooks)
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].backend, "a");
}

#[tokio::test]
async fn test_strict_does_not_mask_valid_occurrence() {
    let harness = TestHarness::new(&["a", "b"]);
    // Backend a reports the release with a better title but no seeders.
    harness
        .backend(0)
        .set_results(
            "Inception",
            vec![fixtures::raw_candidate("shared", "Inception.2010.1080p", 0)],
        )
        .await;
    harness
        .backend(1)
        .set_results(
            "Inception",
            vec![fixtures::raw_candidate("shared", "Inception.The.Movie.2010.1080p", 10)],
        )
        .await;

    let results = harness
        .orchestrator("")
        .look(&fixtures::inception(), true, &NoopHooks)
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].backend, "b");
    assert!(results[0].valid);
}

#[tokio::test]
async fn test_panicking_hooks_do_not_disturb_search() {
    let harness = TestHarness::new(&["a"]);
    harness
        .backend(0)
        .set_results(
            "Inception",
            vec![fixtures::raw_candidate("g1", "Inception.2010.1080p", 10)],
        )
        .await;

    let results = harness
        .orchestrator("")
        .look(&fixtures::inception(), false, &PanickingHooks)
        .await;

    assert_eq!(results.len(), 1);
    assert!(results[0].valid);
}

#[tokio::test]
async fn test_hooks_see_every_candidate() {
    let harness = TestHarness::new(&["a"]);
    harness
        .backend(0)
        .set_results(
            "Inception",
            vec![
                fixtures::raw_candidate("g1", "Inception.2010.1080p", 10),
                fixtures::raw_candidate("g2", "Inception.2010.720p", 0),
            ],
        )
        .await;

    let hooks = RecordingHooks::default();
    harness
        .orchestrator("")
        .look(&fixtures::inception(), true, &hooks)
        .await;

    assert_eq!(
        hooks.events(),
        vec![
            "start:a:Inception",
            "found:a:Inception:2",
            "evaluated:a:g1",
            "evaluated:a:g2",
        ]
    );
}
