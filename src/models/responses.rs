//! Response DTOs for the operational endpoints
//!
//! Analytic payloads are relayed as raw JSON from the query layer; only the
//! health and stats endpoints have fixed shapes of their own.

use serde::Serialize;

use crate::cache::CacheStats;

/// Minute-cache section of the stats response.
#[derive(Debug, Clone, Serialize)]
pub struct MinuteCacheStats {
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that fell through to a handler
    pub misses: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Entries currently held
    pub entries: usize,
    /// Entries reclaimed by sweep passes
    pub swept: u64,
}

/// Warm-store section of the stats response.
#[derive(Debug, Clone, Serialize)]
pub struct WarmStoreStats {
    /// Pre-warmed entries currently held
    pub entries: usize,
    /// Entries that have outlived their TTL and await the next refresh
    pub stale: usize,
    /// Completed warmup/refresh passes since startup
    pub refresh_passes: u64,
    /// Failed fetches across all passes
    pub fetch_errors: u64,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub minute: MinuteCacheStats,
    pub warm: WarmStoreStats,
}

impl StatsResponse {
    /// Assembles the stats response from both cache tiers.
    pub fn new(
        minute: &CacheStats,
        warm_entries: usize,
        warm_stale: usize,
        refresh_passes: u64,
        fetch_errors: u64,
    ) -> Self {
        Self {
            minute: MinuteCacheStats {
                hits: minute.hits,
                misses: minute.misses,
                hit_rate: minute.hit_rate(),
                entries: minute.total_entries,
                swept: minute.swept,
            },
            warm: WarmStoreStats {
                entries: warm_entries,
                stale: warm_stale,
                refresh_passes,
                fetch_errors,
            },
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
