use axum::http::HeaderMap;

pub mod export;
pub mod index;
pub mod query;
pub mod root_route;

/// Caller-supplied `X-Request-Id`, or `-` for log correlation.
pub(crate) fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
}
