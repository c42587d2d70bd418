//! POST /query - answers a question from one project's indexed artifacts.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use contextor::{QueryAnswer, QuerySpec};
use tracing::{debug, info};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::{
        query::query_request::{QueryRequest, QueryResponse},
        request_id,
    },
};

pub const KEY_HEADER: &str = "X-OpenRouter-Key";
pub const MODEL_HEADER: &str = "X-OpenRouter-Model";

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Merges body and headers into a [`QuerySpec`]; non-blank headers win.
pub fn to_spec(headers: &HeaderMap, body: QueryRequest) -> QuerySpec {
    let mut spec = QuerySpec::new(body.query, String::new());
    spec.project_id = body.project_id;
    if let Some(t) = body.doc_type {
        spec.doc_type = t;
    }
    if let Some(s) = body.doc_style {
        spec.doc_style = s;
    }
    if let Some(f) = body.filters {
        spec.extra_filters = f;
    }
    if let Some(k) = body.top_k {
        spec.top_k = k;
    }
    spec.model_id = header_value(headers, MODEL_HEADER).or(body.model);
    spec.credential = header_value(headers, KEY_HEADER).or(body.api_key);
    spec
}

/// Handler: POST /query
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/query \
///   -H 'content-type: application/json' \
///   -H 'X-OpenRouter-Key: sk-or-...' \
///   -H 'X-OpenRouter-Model: openai/gpt-4o-mini' \
///   -d '{"query":"How does auth work?","project_id":"proj_1","doc_type":"Technical"}'
/// ```
pub async fn query_documents(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<QueryRequest>,
) -> AppResult<Json<QueryResponse>> {
    let request_id = request_id(&headers);
    let spec = to_spec(&headers, body);
    debug!(
        request_id = %request_id,
        project = ?spec.project_id,
        doc_type = %spec.doc_type,
        doc_style = %spec.doc_style,
        filters = spec.extra_filters.len(),
        "query_documents: start"
    );

    let QueryAnswer { answer, chunks } = state.engine.query(&spec).await?;

    info!(request_id = %request_id, results = chunks.len(), "query_documents: answered");
    Ok(Json(QueryResponse {
        results: chunks,
        answer,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn body(model: Option<&str>, key: Option<&str>) -> QueryRequest {
        QueryRequest {
            query: "q".into(),
            project_id: Some("p".into()),
            doc_type: None,
            doc_style: None,
            filters: None,
            top_k: None,
            model: model.map(Into::into),
            api_key: key.map(Into::into),
        }
    }

    #[test]
    fn headers_override_body() {
        let mut h = HeaderMap::new();
        h.insert(KEY_HEADER, HeaderValue::from_static("sk-header"));
        h.insert(MODEL_HEADER, HeaderValue::from_static("anthropic/claude-3.5-sonnet"));
        let spec = to_spec(&h, body(Some("openai/gpt-4o-mini"), Some("sk-body")));
        assert_eq!(spec.credential.as_deref(), Some("sk-header"));
        assert_eq!(spec.model_id.as_deref(), Some("anthropic/claude-3.5-sonnet"));
    }

    #[test]
    fn blank_headers_fall_back_to_body() {
        let mut h = HeaderMap::new();
        h.insert(KEY_HEADER, HeaderValue::from_static("  "));
        let spec = to_spec(&h, body(Some("m"), Some("sk-body")));
        assert_eq!(spec.credential.as_deref(), Some("sk-body"));
        assert_eq!(spec.model_id.as_deref(), Some("m"));
        assert_eq!(spec.top_k, contextor::DEFAULT_TOP_K);
        assert_eq!(spec.doc_style, "Technical (Default)");
    }
}
