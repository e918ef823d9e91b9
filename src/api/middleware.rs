//! Minute-Cache Middleware
//!
//! Wraps every analytic route with the minute-window cache: a GET whose key
//! was stored in the current minute bucket is answered without running its
//! handler; otherwise the handler runs and its response is stored — but only
//! when it is a successful JSON response. Errors always recompute.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::debug;

use crate::api::AppState;
use crate::cache::{cache_key_from_query, MAX_CACHEABLE_BODY};

/// Middleware that serves and populates the minute cache.
///
/// Applies only to GET requests under `/api/`; the operational endpoints
/// stay live.
pub async fn minute_cache_layer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET || !request.uri().path().starts_with("/api/") {
        return next.run(request).await;
    }

    let path = request.uri().path().to_string();
    let raw_query = request.uri().query().unwrap_or("");
    let key = cache_key_from_query(&path, raw_query);

    // Lookup mutates stats and lazily evicts, so take the write lock.
    if let Some(payload) = state.minute.write().await.lookup(&key) {
        debug!(key = %key, "minute-cache hit");
        return cached_response(payload);
    }

    let response = next.run(request).await;

    // Only a successful JSON response is worth keeping for the rest of
    // the minute.
    if response.status() != StatusCode::OK || !is_json(&response) {
        return response;
    }
    if body_too_large(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let payload = match axum::body::to_bytes(body, MAX_CACHEABLE_BODY).await {
        Ok(bytes) => bytes,
        Err(_) => {
            // The body was consumed; nothing left to relay.
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    debug!(key = %key, bytes = payload.len(), "minute-cache store");
    state.minute.write().await.store(key, payload.clone());

    Response::from_parts(parts, Body::from(payload))
}

/// Builds a 200 JSON response straight from cached bytes.
fn cached_response(payload: Bytes) -> Response {
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        payload,
    )
        .into_response()
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

fn body_too_large(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .is_some_and(|len| len > MAX_CACHEABLE_BODY)
}
