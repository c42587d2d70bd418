//! POST /index - embeds and stores one developer artifact.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use rag_store::IndexableDocument;
use tracing::{debug, info};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::{
        index::index_request::{IndexRequest, IndexResponse},
        request_id,
    },
};

/// Handler: POST /index
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/index \
///   -H 'content-type: application/json' \
///   -d '{"content":"Auth uses JWT","metadata":{"id":"auth_doc_1","source":"journal",
///        "project_id":"proj_1","created_at":"2024-01-01T00:00:00Z","author_id":"u1",
///        "git_commit_hash":"abc","git_branch":"main","repo_url":"https://github.com/acme/app"}}'
/// ```
pub async fn index_document(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<IndexRequest>,
) -> AppResult<Json<IndexResponse>> {
    let request_id = request_id(&headers);
    debug!(
        request_id = %request_id,
        id = %body.metadata.id,
        project = %body.metadata.project_id,
        "index_document: start"
    );

    let doc = IndexableDocument::from(body);
    let vector_id = state.engine.index(&doc).await?;

    info!(request_id = %request_id, vector_id = %vector_id, "index_document: stored");
    Ok(Json(IndexResponse {
        success: true,
        vector_id,
    }))
}
