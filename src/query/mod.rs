//! Query Module
//!
//! The seam between the cache layer and the backing columnar analytics
//! store. Handlers and the warmup pass both go through [`AnalyticsBackend`];
//! the production implementation talks to the store's HTTP gateway.

mod upstream;

pub use upstream::UpstreamClient;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::QueryError;

// == Aggregate Metrics ==
/// The gross aggregate MEV metrics with a dedicated endpoint each.
///
/// These are the expensive full-window scans the warm store shields the
/// analytics store from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateMetric {
    /// Gross extracted value across all MEV types
    GrossMev,
    /// Gross profit from atomic arbitrage
    AtomicArb,
    /// Gross profit from CEX/DEX arbitrage
    CexDexArb,
    /// Gross profit from sandwich attacks
    Sandwich,
}

impl AggregateMetric {
    /// Every aggregate metric, in warmup order.
    pub const ALL: [AggregateMetric; 4] = [
        AggregateMetric::GrossMev,
        AggregateMetric::AtomicArb,
        AggregateMetric::CexDexArb,
        AggregateMetric::Sandwich,
    ];

    /// The request path serving this metric.
    pub fn path(&self) -> &'static str {
        match self {
            AggregateMetric::GrossMev => "/api/gross-mev",
            AggregateMetric::AtomicArb => "/api/gross-atomic-arb",
            AggregateMetric::CexDexArb => "/api/gross-cex-dex-arb",
            AggregateMetric::Sandwich => "/api/gross-sandwich",
        }
    }
}

// == Analytics Backend ==
/// Computes analytic payloads against the backing store.
///
/// Every method returns the response payload as raw JSON; row-to-response
/// mapping lives behind this trait.
#[async_trait]
pub trait AnalyticsBackend: Send + Sync {
    /// Computes a gross aggregate metric over a time range.
    async fn aggregate(&self, metric: AggregateMetric, time_range: &str)
        -> Result<Value, QueryError>;

    /// Computes bid/auction statistics over a time range.
    async fn bid_stats(&self, time_range: &str) -> Result<Value, QueryError>;

    /// Looks up a single transaction by hash.
    async fn transaction(&self, hash: &str) -> Result<Value, QueryError>;
}
