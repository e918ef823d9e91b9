//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    bid_stats_handler, gross_atomic_arb_handler, gross_cex_dex_arb_handler, gross_mev_handler,
    gross_sandwich_handler, health_handler, stats_handler, transaction_handler, AppState,
};
use super::middleware::minute_cache_layer;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/gross-mev` - Gross extracted value over a time range (pre-warmed)
/// - `GET /api/gross-atomic-arb` - Atomic arbitrage profit (pre-warmed)
/// - `GET /api/gross-cex-dex-arb` - CEX/DEX arbitrage profit (pre-warmed)
/// - `GET /api/gross-sandwich` - Sandwich profit (pre-warmed)
/// - `GET /api/bid-stats` - Bid/auction statistics
/// - `GET /api/transaction/:hash` - Single-transaction lookup
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Minute cache: serves repeated `/api/` GETs within the same minute
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/api/gross-mev", get(gross_mev_handler))
        .route("/api/gross-atomic-arb", get(gross_atomic_arb_handler))
        .route("/api/gross-cex-dex-arb", get(gross_cex_dex_arb_handler))
        .route("/api/gross-sandwich", get(gross_sandwich_handler))
        .route("/api/bid-stats", get(bid_stats_handler))
        .route("/api/transaction/:hash", get(transaction_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            minute_cache_layer,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
