//! POST /export - publishes a generated Markdown document to object storage.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use tracing::{debug, info};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::{
        export::export_request::{ExportRequest, ExportResponse},
        request_id,
    },
};

const MARKDOWN: &str = "text/markdown";

/// Object path for `filename` under `prefix`.
///
/// # Errors
/// [`AppError::BadRequest`] for blank names or names with path separators.
pub fn object_path(prefix: &str, filename: &str) -> AppResult<String> {
    let name = filename.trim();
    if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return Err(AppError::BadRequest(format!(
            "invalid filename '{filename}': expected a bare file name"
        )));
    }
    let prefix = prefix.trim().trim_matches('/');
    Ok(if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    })
}

/// Handler: POST /export
pub async fn export_document(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ExportRequest>,
) -> AppResult<Json<ExportResponse>> {
    let request_id = request_id(&headers);
    let storage = state.storage.as_ref().ok_or(AppError::ExportDisabled)?;
    let path = object_path(&state.export_prefix, &body.filename)?;

    debug!(request_id = %request_id, path = %path, bytes = body.content.len(), "export_document: start");
    let url = storage
        .upload(body.content.into_bytes(), &path, MARKDOWN)
        .await?;

    info!(request_id = %request_id, url = %url, "export_document: uploaded");
    Ok(Json(ExportResponse { success: true, url }))
}
