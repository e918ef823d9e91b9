//! Integration Tests for the Caching Gateway
//!
//! Drives the full router through tower's oneshot, with a counting stub
//! backend in place of the analytics store, and verifies the two cache
//! tiers end to end.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use mev_metrics_api::cache::ManualClock;
use mev_metrics_api::error::QueryError;
use mev_metrics_api::query::{AggregateMetric, AnalyticsBackend};
use mev_metrics_api::{api::create_router, AppState, Config};

// == Helper Functions ==

/// Counting stub for the analytics store.
struct StubBackend {
    aggregate_calls: AtomicUsize,
    bid_stats_calls: AtomicUsize,
    transaction_calls: AtomicUsize,
}

impl StubBackend {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            aggregate_calls: AtomicUsize::new(0),
            bid_stats_calls: AtomicUsize::new(0),
            transaction_calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl AnalyticsBackend for StubBackend {
    async fn aggregate(
        &self,
        metric: AggregateMetric,
        time_range: &str,
    ) -> Result<Value, QueryError> {
        self.aggregate_calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({ "metric": metric.path(), "timeRange": time_range }))
    }

    async fn bid_stats(&self, time_range: &str) -> Result<Value, QueryError> {
        self.bid_stats_calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({ "winRate": 0.42, "timeRange": time_range }))
    }

    async fn transaction(&self, hash: &str) -> Result<Value, QueryError> {
        self.transaction_calls.fetch_add(1, Ordering::SeqCst);
        if hash.starts_with("0xmissing") {
            return Err(QueryError::NotFound(hash.to_string()));
        }
        Ok(json!({ "hash": hash }))
    }
}

fn fast_config() -> Config {
    Config {
        warmup_fetch_delay_ms: 1,
        ..Config::default()
    }
}

fn test_app(backend: Arc<StubBackend>, clock: Arc<ManualClock>) -> (Router, AppState) {
    let state = AppState::with_clock(&fast_config(), backend, clock);
    (create_router(state.clone()), state)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

// == Minute Cache Tests ==

#[tokio::test]
async fn test_repeated_get_is_served_from_minute_cache() {
    let backend = StubBackend::new();
    let clock = Arc::new(ManualClock::new(0));
    let (app, _state) = test_app(backend.clone(), clock);

    let (status, first) = get(&app, "/api/bid-stats?timeRange=7d").await;
    assert_eq!(status, StatusCode::OK);

    let (status, second) = get(&app, "/api/bid-stats?timeRange=7d").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(first, second);
    assert_eq!(backend.bid_stats_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_parameter_order_does_not_split_the_cache() {
    let backend = StubBackend::new();
    let clock = Arc::new(ManualClock::new(0));
    let (app, _state) = test_app(backend.clone(), clock);

    let (status, _) = get(&app, "/api/bid-stats?timeRange=7d&builder=0xabc").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(&app, "/api/bid-stats?builder=0xabc&timeRange=7d").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(backend.bid_stats_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_minute_cache_expires_on_bucket_advance() {
    let backend = StubBackend::new();
    let clock = Arc::new(ManualClock::new(0));
    let (app, _state) = test_app(backend.clone(), clock.clone());

    get(&app, "/api/bid-stats?timeRange=7d").await;
    clock.advance(60_000);
    get(&app, "/api/bid-stats?timeRange=7d").await;

    assert_eq!(backend.bid_stats_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_error_responses_are_never_cached() {
    let backend = StubBackend::new();
    let clock = Arc::new(ManualClock::new(0));
    let (app, state) = test_app(backend.clone(), clock);

    let (status, _) = get(&app, "/api/transaction/0xmissing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, "/api/transaction/0xmissing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Both requests recomputed; the failure left no cache entry behind.
    assert_eq!(backend.transaction_calls.load(Ordering::SeqCst), 2);
    assert!(state.minute.read().await.is_empty());
}

#[tokio::test]
async fn test_distinct_queries_get_distinct_entries() {
    let backend = StubBackend::new();
    let clock = Arc::new(ManualClock::new(0));
    let (app, _state) = test_app(backend.clone(), clock);

    let (_, a) = get(&app, "/api/bid-stats?timeRange=7d").await;
    let (_, b) = get(&app, "/api/bid-stats?timeRange=14d").await;

    assert_ne!(a, b);
    assert_eq!(backend.bid_stats_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_operational_endpoints_are_not_minute_cached() {
    let backend = StubBackend::new();
    let clock = Arc::new(ManualClock::new(0));
    let (app, state) = test_app(backend, clock);

    get(&app, "/health").await;
    get(&app, "/stats").await;

    assert!(state.minute.read().await.is_empty());
}

// == Warm Store Tests ==

#[tokio::test]
async fn test_warmup_pass_populates_the_warm_store() {
    let backend = StubBackend::new();
    let clock = Arc::new(ManualClock::new(0));
    let (app, state) = test_app(backend.clone(), clock);

    let outcome = state.warmer.run_pass().await;
    assert_eq!(outcome.refreshed, 8);
    assert_eq!(outcome.errors, 0);
    assert_eq!(state.warm.read().await.len(), 8);
    assert_eq!(backend.aggregate_calls.load(Ordering::SeqCst), 8);

    // A warm endpoint is now answered without touching the backend again.
    let (status, body) = get(&app, "/api/gross-mev?timeRange=30d").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metric"], "/api/gross-mev");
    assert_eq!(backend.aggregate_calls.load(Ordering::SeqCst), 8);
}

#[tokio::test]
async fn test_unwarmed_range_falls_through_to_backend() {
    let backend = StubBackend::new();
    let clock = Arc::new(ManualClock::new(0));
    let (app, state) = test_app(backend.clone(), clock);

    state.warmer.run_pass().await;
    let calls_after_warmup = backend.aggregate_calls.load(Ordering::SeqCst);

    let (status, _) = get(&app, "/api/gross-mev?timeRange=24hours").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        backend.aggregate_calls.load(Ordering::SeqCst),
        calls_after_warmup + 1
    );
}

// == Stats Endpoint Tests ==

#[tokio::test]
async fn test_stats_reflect_cache_activity() {
    let backend = StubBackend::new();
    let clock = Arc::new(ManualClock::new(0));
    let (app, state) = test_app(backend, clock);

    state.warmer.run_pass().await;
    get(&app, "/api/bid-stats?timeRange=7d").await; // miss
    get(&app, "/api/bid-stats?timeRange=7d").await; // hit

    let (status, stats) = get(&app, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["minute"]["hits"], 1);
    assert_eq!(stats["minute"]["misses"], 1);
    assert_eq!(stats["warm"]["entries"], 8);
    assert_eq!(stats["warm"]["refresh_passes"], 1);
    assert_eq!(stats["warm"]["fetch_errors"], 0);
}

#[tokio::test]
async fn test_health_endpoint_reports_healthy() {
    let backend = StubBackend::new();
    let clock = Arc::new(ManualClock::new(0));
    let (app, _state) = test_app(backend, clock);

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
