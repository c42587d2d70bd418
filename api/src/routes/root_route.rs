use axum::Json;
use serde_json::{Value, json};

/// Handler: GET /
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "DevDoc RAG Service is running" }))
}
