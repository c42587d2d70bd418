use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use crate::core::http::response_envelope::{ApiErrorDetail, ApiResponse};

const REQUEST_ID: &str = "X-Request-Id";

async fn take_body(res: Response) -> (axum::http::response::Parts, Bytes) {
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    (parts, bytes)
}

fn guess_path_from_serde_msg(msg: &str) -> Option<String> {
    for key in [
        "metadata",
        "project_id",
        "query",
        "content",
        "filename",
        "filters",
        "top_k",
    ] {
        if msg.contains(key) {
            return Some(key.to_string());
        }
    }
    None
}

fn hint_from_serde_msg(msg: &str) -> Option<String> {
    if msg.contains("unknown variant") {
        Some("Allowed `source` values: journal, code_file, commit_message.".into())
    } else if msg.contains("premature end of input") || msg.contains("created_at") {
        Some("Timestamps must be RFC3339, e.g. 2024-01-01T00:00:00Z.".into())
    } else if msg.contains("expected a map") || msg.contains("expected struct") {
        Some("Expected a JSON object here (e.g. { \"field\": \"value\" }).".into())
    } else if msg.contains("Content-Type") {
        Some("Send the body with `Content-Type: application/json`.".into())
    } else {
        None
    }
}

fn is_json(parts: &axum::http::response::Parts) -> bool {
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

fn ensure_request_id(parts: &mut axum::http::response::Parts) -> String {
    if let Some(v) = parts.headers.get(REQUEST_ID).and_then(|h| h.to_str().ok()) {
        if !v.trim().is_empty() {
            return v.to_string();
        }
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    let id = format!("req-{nanos}");
    if let Ok(v) = HeaderValue::from_str(&id) {
        parts.headers.insert(REQUEST_ID, v);
    }
    id
}

/// Rewrites plain-text 400/422 rejections (malformed or mistyped JSON bodies)
/// into the JSON error envelope. Responses that are already JSON pass through.
pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    if !(status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY) {
        return res;
    }

    let (mut parts, bytes) = take_body(res).await;
    if is_json(&parts) {
        return Response::from_parts(parts, bytes.into());
    }

    let original = String::from_utf8_lossy(&bytes);
    let request_id = ensure_request_id(&mut parts);
    debug!(request_id = %request_id, status = %status, "rewriting body rejection");

    let detail = ApiErrorDetail {
        path: guess_path_from_serde_msg(&original),
        hint: hint_from_serde_msg(&original),
    };

    let envelope = ApiResponse::error(
        if status == StatusCode::BAD_REQUEST {
            "BAD_REQUEST"
        } else {
            "UNPROCESSABLE_ENTITY"
        },
        original.trim(),
        vec![detail],
    );

    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };

    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts.headers.remove(header::CONTENT_LENGTH);

    Response::from_parts(parts, body.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_field_and_hint() {
        let msg = "Failed to deserialize the JSON body into the target type: metadata.source: unknown variant `slack`";
        assert_eq!(guess_path_from_serde_msg(msg).as_deref(), Some("metadata"));
        assert!(hint_from_serde_msg(msg).unwrap().contains("commit_message"));
        assert_eq!(guess_path_from_serde_msg("nothing here"), None);
    }

    #[test]
    fn request_id_is_generated_once() {
        let (mut parts, _) = Response::new(Body::empty()).into_parts();
        let id = ensure_request_id(&mut parts);
        assert!(id.starts_with("req-"));
        assert_eq!(ensure_request_id(&mut parts), id);
        assert!(!is_json(&parts));
    }
}
