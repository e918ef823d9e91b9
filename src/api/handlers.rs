//! API Handlers
//!
//! HTTP request handlers for the analytic and operational endpoints.
//! Handlers for the pre-warmed aggregates prefer a warm-store hit over
//! recomputation; everything else goes straight to the query layer.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{cache_key, Clock, MinuteCache, SystemClock, TtlPolicy, TtlStore};
use crate::config::Config;
use crate::error::Result;
use crate::models::{HealthResponse, StatsResponse, TimeRangeQuery};
use crate::query::{AggregateMetric, AnalyticsBackend};
use crate::warmup::CacheWarmer;

/// Application state shared across all handlers.
///
/// Holds both cache tiers, the query backend, and the warmer whose counters
/// feed the stats endpoint.
#[derive(Clone)]
pub struct AppState {
    /// Minute-quantized response cache, written by the middleware
    pub minute: Arc<RwLock<MinuteCache>>,
    /// Pre-warmed store for the expensive aggregate endpoints
    pub warm: Arc<RwLock<TtlStore>>,
    /// Shared query layer
    pub backend: Arc<dyn AnalyticsBackend>,
    /// Warmup/refresh pass runner
    pub warmer: Arc<CacheWarmer>,
}

impl AppState {
    /// Creates application state from configuration using the system clock.
    pub fn new(config: &Config, backend: Arc<dyn AnalyticsBackend>) -> Self {
        Self::with_clock(config, backend, Arc::new(SystemClock))
    }

    /// Creates application state with an injected clock, so bucket and TTL
    /// math can be driven by tests.
    pub fn with_clock(
        config: &Config,
        backend: Arc<dyn AnalyticsBackend>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let minute = Arc::new(RwLock::new(MinuteCache::new(
            config.bucket_width_ms,
            clock.clone(),
        )));
        let warm = Arc::new(RwLock::new(TtlStore::new(clock)));

        // Warm entries stay fresh for exactly one refresh cadence.
        let policy = TtlPolicy::new(Duration::from_secs(config.refresh_interval));
        let warmer = Arc::new(CacheWarmer::new(
            backend.clone(),
            warm.clone(),
            policy,
            Duration::from_millis(config.warmup_fetch_delay_ms),
        ));

        Self {
            minute,
            warm,
            backend,
            warmer,
        }
    }
}

// == Aggregate Handlers ==

/// Handler for GET /api/gross-mev
pub async fn gross_mev_handler(
    State(state): State<AppState>,
    Query(params): Query<TimeRangeQuery>,
) -> Result<Json<Value>> {
    serve_aggregate(&state, AggregateMetric::GrossMev, &params.time_range).await
}

/// Handler for GET /api/gross-atomic-arb
pub async fn gross_atomic_arb_handler(
    State(state): State<AppState>,
    Query(params): Query<TimeRangeQuery>,
) -> Result<Json<Value>> {
    serve_aggregate(&state, AggregateMetric::AtomicArb, &params.time_range).await
}

/// Handler for GET /api/gross-cex-dex-arb
pub async fn gross_cex_dex_arb_handler(
    State(state): State<AppState>,
    Query(params): Query<TimeRangeQuery>,
) -> Result<Json<Value>> {
    serve_aggregate(&state, AggregateMetric::CexDexArb, &params.time_range).await
}

/// Handler for GET /api/gross-sandwich
pub async fn gross_sandwich_handler(
    State(state): State<AppState>,
    Query(params): Query<TimeRangeQuery>,
) -> Result<Json<Value>> {
    serve_aggregate(&state, AggregateMetric::Sandwich, &params.time_range).await
}

/// Serves a gross aggregate, preferring the pre-warmed payload.
///
/// A warm hit is served even past its TTL: the refresh task overwrites the
/// entry on its own cadence, and a scan against the backing store is always
/// worse than a slightly stale aggregate.
async fn serve_aggregate(
    state: &AppState,
    metric: AggregateMetric,
    time_range: &str,
) -> Result<Json<Value>> {
    let key = cache_key(metric.path(), &[("timeRange", time_range)]);

    if let Some(payload) = state.warm.read().await.get(&key) {
        debug!(key = %key, "serving pre-warmed aggregate");
        return Ok(Json(payload));
    }

    let payload = state.backend.aggregate(metric, time_range).await?;
    Ok(Json(payload))
}

// == Other Analytic Handlers ==

/// Handler for GET /api/bid-stats
pub async fn bid_stats_handler(
    State(state): State<AppState>,
    Query(params): Query<TimeRangeQuery>,
) -> Result<Json<Value>> {
    let payload = state.backend.bid_stats(&params.time_range).await?;
    Ok(Json(payload))
}

/// Handler for GET /api/transaction/:hash
pub async fn transaction_handler(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<Value>> {
    let payload = state.backend.transaction(&hash).await?;
    Ok(Json(payload))
}

// == Operational Handlers ==

/// Handler for GET /stats
///
/// Returns counters for both cache tiers.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let minute_stats = state.minute.read().await.stats();
    let (warm_entries, warm_stale) = {
        let warm = state.warm.read().await;
        (warm.len(), warm.stale_count())
    };

    Json(StatsResponse::new(
        &minute_stats,
        warm_entries,
        warm_stale,
        state.warmer.pass_count(),
        state.warmer.error_count(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
