//! Warm TTL Store
//!
//! Long-lived keyed store for pre-warmed analytic responses. Entries carry an
//! absolute expiry and an optional producer closure that recomputes them;
//! freshness is maintained proactively by the refresh task rather than
//! enforced on read.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::cache::Clock;
use crate::error::QueryError;

// == Producer ==
/// Future returned by a producer invocation.
pub type ProducerFuture = Pin<Box<dyn Future<Output = Result<Value, QueryError>> + Send>>;

/// Zero-argument closure that recomputes the payload for one cache key.
pub type Producer = Arc<dyn Fn() -> ProducerFuture + Send + Sync>;

// == TTL Entry ==
/// A pre-warmed payload with its expiry and refresh closure.
pub struct TtlEntry {
    /// The cached JSON payload
    pub payload: Value,
    /// Absolute expiry (Unix milliseconds): refresh time + TTL
    pub expires_at_ms: u64,
    /// Refresh closure; an entry without one only serves until natural expiry
    pub producer: Option<Producer>,
}

// == TTL Store ==
/// Mapping from canonical cache key to a TTL-bounded payload.
pub struct TtlStore {
    entries: HashMap<String, TtlEntry>,
    clock: Arc<dyn Clock>,
}

impl TtlStore {
    // == Constructor ==
    /// Creates an empty store using the given time source for expiry math.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            clock,
        }
    }

    // == Set ==
    /// Inserts or overwrites the payload for `key` with expiry `now + ttl`.
    ///
    /// An already-registered producer survives the overwrite.
    pub fn set(&mut self, key: String, payload: Value, ttl: Duration) {
        let expires_at_ms = self.clock.now_ms() + ttl.as_millis() as u64;

        match self.entries.get_mut(&key) {
            Some(entry) => {
                entry.payload = payload;
                entry.expires_at_ms = expires_at_ms;
            }
            None => {
                self.entries.insert(
                    key,
                    TtlEntry {
                        payload,
                        expires_at_ms,
                        producer: None,
                    },
                );
            }
        }
    }

    // == Get ==
    /// Returns the payload for `key` regardless of expiry.
    ///
    /// The refresh task overwrites entries on a fixed cadence, so a stale
    /// payload is served as-is rather than dropped (stale-while-revalidate).
    /// Callers that need strict freshness can check [`TtlStore::is_fresh`].
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(|entry| entry.payload.clone())
    }

    /// Returns whether the entry for `key` is within its TTL.
    pub fn is_fresh(&self, key: &str) -> Option<bool> {
        self.entries
            .get(key)
            .map(|entry| self.clock.now_ms() < entry.expires_at_ms)
    }

    // == Register Producer ==
    /// Associates a refresh closure with `key`. Last registration wins.
    ///
    /// Registering for a key with no stored payload is a no-op: a producer
    /// only makes sense for an entry the warmup pass has populated.
    pub fn register_producer(&mut self, key: &str, producer: Producer) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.producer = Some(producer);
        }
    }

    /// Returns the producer registered for `key`, if any.
    pub fn producer(&self, key: &str) -> Option<Producer> {
        self.entries.get(key).and_then(|entry| entry.producer.clone())
    }

    // == Introspection ==
    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns how many entries have outlived their TTL.
    pub fn stale_count(&self) -> usize {
        let now = self.clock.now_ms();
        self.entries
            .values()
            .filter(|entry| now >= entry.expires_at_ms)
            .count()
    }
}

// == TTL Policy ==
/// Maps a cache key to the duration its pre-warmed entry stays fresh.
///
/// Every warm key currently shares the refresh cadence, but the policy is a
/// separate seam so near-real-time ranges can get shorter TTLs later without
/// touching the store.
#[derive(Debug, Clone)]
pub struct TtlPolicy {
    default_ttl: Duration,
    overrides: HashMap<String, Duration>,
}

impl TtlPolicy {
    /// Creates a policy where every key maps to `default_ttl`.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            overrides: HashMap::new(),
        }
    }

    /// Adds a per-key TTL override.
    pub fn with_override(mut self, key: impl Into<String>, ttl: Duration) -> Self {
        self.overrides.insert(key.into(), ttl);
        self
    }

    /// Returns the TTL for `key`.
    ///
    /// Total over all keys: an unknown key falls back to the default rather
    /// than failing the warmup pass.
    pub fn ttl_for(&self, key: &str) -> Duration {
        self.overrides.get(key).copied().unwrap_or(self.default_ttl)
    }
}
