//! Cache Module
//!
//! Two-tier response caching: a minute-quantized short-TTL cache for
//! arbitrary GET responses, and a keyed warm store with explicit TTLs for
//! the pre-warmed aggregate endpoints.

mod clock;
mod key;
mod minute;
mod stats;
mod ttl;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use key::{cache_key, cache_key_from_query};
pub use minute::{MinuteCache, MinuteEntry};
pub use stats::CacheStats;
pub use ttl::{Producer, ProducerFuture, TtlEntry, TtlPolicy, TtlStore};

// == Public Constants ==
/// Width of a minute-cache validity bucket in milliseconds
pub const DEFAULT_BUCKET_WIDTH_MS: u64 = 60_000;

/// Largest response body the minute cache will hold, in bytes
pub const MAX_CACHEABLE_BODY: usize = 4 * 1024 * 1024; // 4 MB
