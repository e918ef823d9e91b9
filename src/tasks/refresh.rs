//! Warm-Store Refresh Task
//!
//! Background task that re-runs the full warmup pass on a fixed cadence,
//! overwriting every warm entry in place. A failing fetch only skips its
//! own key; the pass and the task both keep going.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::warmup::CacheWarmer;

/// Spawns a background task that periodically re-runs the warmup pass.
///
/// # Arguments
/// * `warmer` - The warmer whose pass is re-run on every tick
/// * `refresh_interval_secs` - Interval in seconds between passes
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_refresh_task(
    warmer: Arc<CacheWarmer>,
    refresh_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(refresh_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting warm-store refresh task with interval of {} seconds",
            refresh_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let outcome = warmer.run_pass().await;
            info!(
                refreshed = outcome.refreshed,
                errors = outcome.errors,
                "Scheduled refresh pass finished"
            );
        }
    })
}
