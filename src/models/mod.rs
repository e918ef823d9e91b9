//! Models Module
//!
//! Request and response DTOs for the HTTP API.

pub mod requests;
pub mod responses;

pub use requests::TimeRangeQuery;
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
