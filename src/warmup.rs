//! Cache Warmup
//!
//! Populates the warm store for the fixed set of expensive aggregate
//! queries, strictly sequentially and throttled, so the analytics store
//! never sees a burst of full-window scans. The refresh task re-runs the
//! same pass on a timer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::cache::{cache_key, Producer, TtlPolicy, TtlStore};
use crate::query::{AggregateMetric, AnalyticsBackend};

/// Time ranges every aggregate metric is pre-warmed for.
pub const WARM_RANGES: [&str; 2] = ["30d", "90d"];

// == Pass Outcome ==
/// Result of one warmup pass over the full endpoint×range set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarmupOutcome {
    /// Number of keys fetched and written into the warm store
    pub refreshed: usize,
    /// Number of keys whose fetch failed and was skipped
    pub errors: usize,
}

// == Cache Warmer ==
/// Runs the sequential fetch-and-populate pass over the warm key set.
pub struct CacheWarmer {
    backend: Arc<dyn AnalyticsBackend>,
    store: Arc<RwLock<TtlStore>>,
    policy: TtlPolicy,
    fetch_delay: Duration,
    passes: AtomicU64,
    errors: AtomicU64,
}

impl CacheWarmer {
    // == Constructor ==
    /// Creates a warmer over the given backend and warm store.
    ///
    /// # Arguments
    /// * `backend` - Shared query layer, also used by the route handlers
    /// * `store` - Warm store the pass populates
    /// * `policy` - Maps each warm key to its TTL
    /// * `fetch_delay` - Throttle slept after every fetch
    pub fn new(
        backend: Arc<dyn AnalyticsBackend>,
        store: Arc<RwLock<TtlStore>>,
        policy: TtlPolicy,
        fetch_delay: Duration,
    ) -> Self {
        Self {
            backend,
            store,
            policy,
            fetch_delay,
            passes: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    /// The fixed endpoint×range product, in fetch order.
    pub fn targets() -> Vec<(AggregateMetric, &'static str)> {
        let mut targets = Vec::with_capacity(AggregateMetric::ALL.len() * WARM_RANGES.len());
        for metric in AggregateMetric::ALL {
            for range in WARM_RANGES {
                targets.push((metric, range));
            }
        }
        targets
    }

    /// Canonical warm-store key for one (metric, range) target.
    pub fn target_key(metric: AggregateMetric, range: &str) -> String {
        cache_key(metric.path(), &[("timeRange", range)])
    }

    // == Warmup Pass ==
    /// Fetches every warm target once, sequentially, sleeping the configured
    /// delay after each fetch.
    ///
    /// A failing fetch is logged and skipped; the entry it would have
    /// replaced (if any) is left in place, and the pass continues. On
    /// success the payload is stored under its TTL and the target's
    /// producer is (re-)registered.
    pub async fn run_pass(&self) -> WarmupOutcome {
        let mut outcome = WarmupOutcome::default();

        for (metric, range) in Self::targets() {
            let key = Self::target_key(metric, range);

            match self.backend.aggregate(metric, range).await {
                Ok(payload) => {
                    let ttl = self.policy.ttl_for(&key);
                    let mut store = self.store.write().await;
                    store.set(key.clone(), payload, ttl);
                    store.register_producer(&key, self.producer_for(metric, range));
                    outcome.refreshed += 1;
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "warmup fetch failed, keeping previous entry");
                    outcome.errors += 1;
                }
            }

            // Throttle between fetches so the backing store never sees the
            // whole warm set at once.
            tokio::time::sleep(self.fetch_delay).await;
        }

        self.passes.fetch_add(1, Ordering::Relaxed);
        self.errors.fetch_add(outcome.errors as u64, Ordering::Relaxed);
        info!(
            refreshed = outcome.refreshed,
            errors = outcome.errors,
            "warmup pass complete"
        );

        outcome
    }

    /// Builds the zero-argument refresh closure for one target.
    fn producer_for(&self, metric: AggregateMetric, range: &'static str) -> Producer {
        let backend = self.backend.clone();
        Arc::new(move || {
            let backend = backend.clone();
            Box::pin(async move { backend.aggregate(metric, range).await })
        })
    }

    // == Counters ==
    /// Number of completed passes since startup.
    pub fn pass_count(&self) -> u64 {
        self.passes.load(Ordering::Relaxed)
    }

    /// Number of failed fetches across all passes.
    pub fn error_count(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{ManualClock, TtlStore};
    use crate::error::QueryError;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashSet;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    /// Backend stub that counts calls and fails for a configured key set.
    struct StubBackend {
        calls: AtomicUsize,
        failing: Mutex<HashSet<(AggregateMetric, String)>>,
    }

    impl StubBackend {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failing: Mutex::new(HashSet::new()),
            }
        }

        fn fail_for(&self, metric: AggregateMetric, range: &str) {
            self.failing
                .lock()
                .unwrap()
                .insert((metric, range.to_string()));
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalyticsBackend for StubBackend {
        async fn aggregate(
            &self,
            metric: AggregateMetric,
            time_range: &str,
        ) -> Result<Value, QueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let failing = self.failing.lock().unwrap();
            if failing.contains(&(metric, time_range.to_string())) {
                return Err(QueryError::Transport("injected failure".to_string()));
            }
            Ok(json!({ "metric": metric.path(), "timeRange": time_range }))
        }

        async fn bid_stats(&self, _time_range: &str) -> Result<Value, QueryError> {
            unimplemented!("not used by the warmup pass")
        }

        async fn transaction(&self, _hash: &str) -> Result<Value, QueryError> {
            unimplemented!("not used by the warmup pass")
        }
    }

    fn warmer_with(backend: Arc<StubBackend>, delay: Duration) -> CacheWarmer {
        let clock = Arc::new(ManualClock::new(0));
        let store = Arc::new(RwLock::new(TtlStore::new(clock)));
        CacheWarmer::new(
            backend,
            store,
            TtlPolicy::new(Duration::from_secs(1800)),
            delay,
        )
    }

    #[test]
    fn test_targets_are_the_full_cross_product() {
        let targets = CacheWarmer::targets();
        assert_eq!(targets.len(), 8);

        let keys: HashSet<String> = targets
            .iter()
            .map(|(m, r)| CacheWarmer::target_key(*m, r))
            .collect();
        assert_eq!(keys.len(), 8);
        assert!(keys.contains("/api/gross-mev?timeRange=30d"));
        assert!(keys.contains("/api/gross-sandwich?timeRange=90d"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pass_populates_every_target_with_producer() {
        let backend = Arc::new(StubBackend::new());
        let warmer = warmer_with(backend.clone(), Duration::from_millis(100));

        let outcome = warmer.run_pass().await;
        assert_eq!(outcome, WarmupOutcome { refreshed: 8, errors: 0 });

        let store = warmer.store.read().await;
        assert_eq!(store.len(), 8);
        for (metric, range) in CacheWarmer::targets() {
            let key = CacheWarmer::target_key(metric, range);
            assert!(store.get(&key).is_some(), "missing payload for {}", key);
            assert!(store.producer(&key).is_some(), "missing producer for {}", key);
            assert_eq!(store.is_fresh(&key), Some(true));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_pass_overwrites_in_place() {
        let backend = Arc::new(StubBackend::new());
        let warmer = warmer_with(backend.clone(), Duration::from_millis(100));

        warmer.run_pass().await;
        warmer.run_pass().await;

        let store = warmer.store.read().await;
        assert_eq!(store.len(), 8, "second pass must not duplicate entries");
        assert_eq!(backend.call_count(), 16);
        assert_eq!(warmer.pass_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_failure_does_not_halt_the_pass() {
        let backend = Arc::new(StubBackend::new());
        backend.fail_for(AggregateMetric::AtomicArb, "30d");
        let warmer = warmer_with(backend.clone(), Duration::from_millis(100));

        let outcome = warmer.run_pass().await;
        assert_eq!(outcome, WarmupOutcome { refreshed: 7, errors: 1 });
        assert_eq!(warmer.error_count(), 1);

        let store = warmer.store.read().await;
        assert_eq!(store.len(), 7);
        assert!(store
            .get("/api/gross-atomic-arb?timeRange=30d")
            .is_none());
        assert!(store
            .get("/api/gross-atomic-arb?timeRange=90d")
            .is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_keeps_previous_payload() {
        let backend = Arc::new(StubBackend::new());
        let warmer = warmer_with(backend.clone(), Duration::from_millis(100));

        warmer.run_pass().await;
        backend.fail_for(AggregateMetric::GrossMev, "30d");
        let outcome = warmer.run_pass().await;

        assert_eq!(outcome.errors, 1);
        let store = warmer.store.read().await;
        // The stale-but-present entry from the first pass survives.
        assert!(store.get("/api/gross-mev?timeRange=30d").is_some());
        assert_eq!(store.len(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pass_is_throttled_between_fetches() {
        let backend = Arc::new(StubBackend::new());
        let delay = Duration::from_millis(100);
        let warmer = warmer_with(backend, delay);

        let started = tokio::time::Instant::now();
        warmer.run_pass().await;
        let elapsed = started.elapsed();

        // Eight fetches with a delay after each: at least 7 gaps.
        assert!(
            elapsed >= delay * 7,
            "pass finished too quickly: {:?}",
            elapsed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_registered_producer_recomputes_its_target() {
        let backend = Arc::new(StubBackend::new());
        let warmer = warmer_with(backend.clone(), Duration::from_millis(1));

        warmer.run_pass().await;
        let producer = {
            let store = warmer.store.read().await;
            store.producer("/api/gross-cex-dex-arb?timeRange=90d").unwrap()
        };

        let payload = producer().await.unwrap();
        assert_eq!(
            payload,
            json!({ "metric": "/api/gross-cex-dex-arb", "timeRange": "90d" })
        );
    }
}
