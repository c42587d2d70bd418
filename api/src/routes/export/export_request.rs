use serde::{Deserialize, Serialize};

/// Request payload for /export.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    /// Markdown document to publish.
    pub content: String,
    /// Bare file name, e.g. `architecture.md`.
    pub filename: String,
}

/// Response payload for /export.
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub success: bool,
    pub url: String,
}
