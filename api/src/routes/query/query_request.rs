use contextor::RetrievedChunk;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request payload for /query.
///
/// `model` and `api_key` are overridden by the `X-OpenRouter-Model` /
/// `X-OpenRouter-Key` headers when those are present.
#[derive(Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub doc_style: Option<String>,
    /// Extra equality filters ANDed after the project clause.
    #[serde(default)]
    pub filters: Option<Map<String, Value>>,
    #[serde(default)]
    pub top_k: Option<u64>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Response payload for /query.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub results: Vec<RetrievedChunk>,
    pub answer: String,
}
