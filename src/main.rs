//! MEV Metrics API - a caching gateway for time-windowed analytics queries
//!
//! Shields the backing columnar store behind two cache tiers: a
//! minute-quantized cache for arbitrary GET responses and a pre-warmed,
//! TTL-bounded store for the expensive gross aggregate endpoints.

mod api;
mod cache;
mod config;
mod error;
mod models;
mod query;
mod tasks;
mod warmup;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;
use query::UpstreamClient;
use tasks::{spawn_refresh_task, spawn_sweep_task};

/// Main entry point for the analytics gateway.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the upstream client and both cache tiers
/// 4. Kick off the initial warmup pass in the background
/// 5. Start the sweep and refresh background tasks
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM, aborting both tasks
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mev_metrics_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MEV Metrics API");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, upstream={}, sweep_interval={}s, refresh_interval={}s",
        config.server_port, config.upstream_url, config.sweep_interval, config.refresh_interval
    );

    // Build the query layer and application state
    let backend = Arc::new(UpstreamClient::new(config.upstream_url.clone()));
    let state = AppState::new(&config, backend);
    info!("Cache tiers initialized");

    // Populate the warm store without holding up the listener; the refresh
    // task re-runs the same pass on its cadence afterwards.
    let warmer = state.warmer.clone();
    tokio::spawn(async move {
        let outcome = warmer.run_pass().await;
        info!(
            refreshed = outcome.refreshed,
            errors = outcome.errors,
            "Initial warmup pass finished"
        );
    });

    // Start background tasks
    let sweep_handle = spawn_sweep_task(state.minute.clone(), config.sweep_interval);
    let refresh_handle = spawn_refresh_task(state.warmer.clone(), config.refresh_interval);
    info!("Background sweep and refresh tasks started");

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(vec![sweep_handle, refresh_handle]))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the background tasks and allows graceful shutdown.
async fn shutdown_signal(background_tasks: Vec<JoinHandle<()>>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    // Abort the sweep and refresh tasks
    for handle in background_tasks {
        handle.abort();
    }
    warn!("Background tasks aborted");
}
