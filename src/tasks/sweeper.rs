//! Minute-Cache Sweep Task
//!
//! Background task that periodically removes minute-cache entries whose
//! bucket has fallen behind the clock, bounding memory growth from one-off
//! query shapes. Purely reclamation: swept entries were already unreadable.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MinuteCache;

/// Spawns a background task that periodically sweeps the minute cache.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweep passes.
///
/// # Arguments
/// * `cache` - Shared reference to the minute cache
/// * `sweep_interval_secs` - Interval in seconds between sweep passes
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_sweep_task(
    cache: Arc<RwLock<MinuteCache>>,
    sweep_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting minute-cache sweep task with interval of {} seconds",
            sweep_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.sweep()
            };

            if removed > 0 {
                info!("Sweep pass: removed {} superseded entries", removed);
            } else {
                debug!("Sweep pass: nothing to remove");
            }
        }
    })
}
