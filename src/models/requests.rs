//! Request DTOs for the analytics API
//!
//! Defines the query parameters accepted by the analytic endpoints.

use serde::Deserialize;

/// Query parameters for the time-windowed analytic endpoints.
///
/// The range value is passed to the query layer exactly as it appeared on
/// the wire; the backing store owns its interpretation.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeRangeQuery {
    /// Window the aggregate is computed over, e.g. `24hours`, `30d`, `90d`
    #[serde(rename = "timeRange", default = "default_time_range")]
    pub time_range: String,
}

fn default_time_range() -> String {
    "24hours".to_string()
}
