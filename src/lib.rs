//! MEV Metrics API - a caching gateway for time-windowed analytics queries
//!
//! Shields the backing columnar store behind two cache tiers: a
//! minute-quantized cache for arbitrary GET responses and a pre-warmed,
//! TTL-bounded store for the expensive gross aggregate endpoints.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod tasks;
pub mod warmup;

pub use api::AppState;
pub use config::Config;
pub use tasks::{spawn_refresh_task, spawn_sweep_task};
pub use warmup::CacheWarmer;
