//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Base URL of the backing analytics store's HTTP gateway
    pub upstream_url: String,
    /// Minute-cache sweep interval in seconds
    pub sweep_interval: u64,
    /// Warm-store refresh interval in seconds
    pub refresh_interval: u64,
    /// Delay between consecutive warmup fetches in milliseconds
    pub warmup_fetch_delay_ms: u64,
    /// Width of a minute-cache validity bucket in milliseconds
    pub bucket_width_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `UPSTREAM_URL` - Analytics store base URL (default: http://127.0.0.1:8123)
    /// - `SWEEP_INTERVAL` - Minute-cache sweep frequency in seconds (default: 300)
    /// - `REFRESH_INTERVAL` - Warm-store refresh cadence in seconds (default: 1800)
    /// - `WARMUP_FETCH_DELAY_MS` - Inter-fetch throttle in milliseconds (default: 100)
    /// - `MINUTE_BUCKET_MS` - Validity bucket width in milliseconds (default: 60000)
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            upstream_url: env::var("UPSTREAM_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8123".to_string()),
            sweep_interval: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            refresh_interval: env::var("REFRESH_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1800),
            warmup_fetch_delay_ms: env::var("WARMUP_FETCH_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            bucket_width_ms: env::var("MINUTE_BUCKET_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(crate::cache::DEFAULT_BUCKET_WIDTH_MS),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            upstream_url: "http://127.0.0.1:8123".to_string(),
            sweep_interval: 300,
            refresh_interval: 1800,
            warmup_fetch_delay_ms: 100,
            bucket_width_ms: crate::cache::DEFAULT_BUCKET_WIDTH_MS,
        }
    }
}
