//! Error types for the analytics gateway
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Query Error Enum ==
/// Failure while computing a payload against the backing analytics store.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The upstream request could not be sent or completed
    #[error("upstream request failed: {0}")]
    Transport(String),

    /// The upstream answered with a non-success status
    #[error("upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// The upstream body was not the JSON we expected
    #[error("failed to decode upstream response: {0}")]
    Decode(String),

    /// The requested entity does not exist
    #[error("not found: {0}")]
    NotFound(String),
}

// == Api Error Enum ==
/// Unified error type surfaced by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Query against the analytics store failed
    #[error(transparent)]
    Query(#[from] QueryError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Query(QueryError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, format!("not found: {}", msg))
            }
            ApiError::Query(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
