//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Minute-cache sweep: reclaims superseded minute-cache entries
//! - Warm-store refresh: re-runs the warmup pass on a fixed cadence

mod refresh;
mod sweeper;

pub use refresh::spawn_refresh_task;
pub use sweeper::spawn_sweep_task;
