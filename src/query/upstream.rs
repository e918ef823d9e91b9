//! Upstream Analytics Client
//!
//! HTTP implementation of [`AnalyticsBackend`] against the columnar store's
//! query gateway. A non-200 response or a body that fails to parse as JSON
//! is a query failure; the cache layer never stores either.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::error::QueryError;
use crate::query::{AggregateMetric, AnalyticsBackend};

/// Per-request timeout against the upstream gateway.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

// == Upstream Client ==
/// reqwest-backed client for the analytics store's HTTP gateway.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    /// Creates a client against the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Issues a GET against `path` and parses the body as JSON.
    async fn fetch_json(&self, path: &str) -> Result<Value, QueryError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(QueryError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueryError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| QueryError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AnalyticsBackend for UpstreamClient {
    async fn aggregate(
        &self,
        metric: AggregateMetric,
        time_range: &str,
    ) -> Result<Value, QueryError> {
        let path = format!("{}?timeRange={}", metric.path(), time_range);
        self.fetch_json(&path).await
    }

    async fn bid_stats(&self, time_range: &str) -> Result<Value, QueryError> {
        let path = format!("/api/bid-stats?timeRange={}", time_range);
        self.fetch_json(&path).await
    }

    async fn transaction(&self, hash: &str) -> Result<Value, QueryError> {
        let path = format!("/api/transaction/{}", hash);
        self.fetch_json(&path).await
    }
}
