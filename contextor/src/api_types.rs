//! Public API types re-used by external crates (e.g., the HTTP API layer).

use serde::Serialize;
use serde_json::{Map, Value};

use crate::prompt::{DEFAULT_DOC_STYLE, DEFAULT_DOC_TYPE};

pub const DEFAULT_TOP_K: u64 = 10;

/// One question against one project.
///
/// `project_id`, `model_id` and `credential` are optional here so that the
/// engine, not the caller, decides how a missing value is reported.
///
/// # Example
/// ```
/// use contextor::QuerySpec;
/// let spec = QuerySpec::new("How does auth work?", "proj_1")
///     .with_model("openai/gpt-4o-mini")
///     .with_credential("sk-or-...");
/// assert_eq!(spec.top_k, 10);
/// assert_eq!(spec.doc_type, "Technical");
/// ```
#[derive(Clone)]
pub struct QuerySpec {
    pub query_text: String,
    pub project_id: Option<String>,
    pub doc_type: String,
    pub doc_style: String,
    /// Extra equality filters, ANDed after the tenant clause in this order.
    pub extra_filters: Map<String, Value>,
    pub top_k: u64,
    pub model_id: Option<String>,
    pub credential: Option<String>,
}

impl QuerySpec {
    pub fn new(query_text: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            query_text: query_text.into(),
            project_id: Some(project_id.into()),
            doc_type: DEFAULT_DOC_TYPE.into(),
            doc_style: DEFAULT_DOC_STYLE.into(),
            extra_filters: Map::new(),
            top_k: DEFAULT_TOP_K,
            model_id: None,
            credential: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_id = Some(model.into());
        self
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_filters.insert(key.into(), value.into());
        self
    }
}

impl std::fmt::Debug for QuerySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuerySpec")
            .field("query_text", &self.query_text)
            .field("project_id", &self.project_id)
            .field("doc_type", &self.doc_type)
            .field("doc_style", &self.doc_style)
            .field("extra_filters", &self.extra_filters)
            .field("top_k", &self.top_k)
            .field("model_id", &self.model_id)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A chunk that was retrieved and handed to the model.
#[derive(Clone, Debug, Serialize)]
pub struct RetrievedChunk {
    pub id: String,
    pub content: String,
    pub score: f32,
    pub metadata: Map<String, Value>,
}

/// Final answer together with the chunks it was grounded on.
#[derive(Clone, Debug, Serialize)]
pub struct QueryAnswer {
    pub answer: String,
    pub chunks: Vec<RetrievedChunk>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_credential() {
        let spec = QuerySpec::new("q", "p").with_credential("sk-secret");
        let s = format!("{spec:?}");
        assert!(!s.contains("sk-secret"));
        assert!(s.contains("<redacted>"));
    }

    #[test]
    fn filters_keep_insertion_order() {
        let spec = QuerySpec::new("q", "p")
            .with_filter("source", "journal")
            .with_filter("git_branch", "main");
        let keys: Vec<&str> = spec.extra_filters.keys().map(String::as_str).collect();
        assert_eq!(keys, ["source", "git_branch"]);
    }
}
