//! API Module
//!
//! HTTP handlers, routing, and the minute-cache middleware for the
//! analytics gateway.
//!
//! # Endpoints
//! - `GET /api/gross-mev` - Gross extracted value over a time range
//! - `GET /api/gross-atomic-arb` - Atomic arbitrage profit
//! - `GET /api/gross-cex-dex-arb` - CEX/DEX arbitrage profit
//! - `GET /api/gross-sandwich` - Sandwich profit
//! - `GET /api/bid-stats` - Bid/auction statistics
//! - `GET /api/transaction/:hash` - Single-transaction lookup
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
