//! Unified error types for the crate.

use ai_llm_service::AiLlmError;
use qdrant_client::QdrantError;
use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// Caller supplied an unusable value (empty tenant, empty id, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON parsing / serialization errors.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Embedding length differs from the collection dimension.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Embedding provider failure (HTTP, decode, provider config).
    #[error("embedding error: {0}")]
    Embedding(#[from] AiLlmError),

    /// Qdrant client errors, tagged with the operation that failed.
    #[error("qdrant {op} failed: {source}")]
    Qdrant {
        op: &'static str,
        #[source]
        source: QdrantError,
    },
}

impl RagError {
    /// Adapter for `map_err` on Qdrant client calls.
    pub(crate) fn qdrant(op: &'static str) -> impl FnOnce(QdrantError) -> Self {
        move |source| RagError::Qdrant { op, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn qdrant_cause_is_preserved() {
        let cause = qdrant_client::Payload::try_from(serde_json::json!("not an object"))
            .unwrap_err();
        let err = RagError::qdrant("payload_convert")(cause);
        assert!(err.to_string().starts_with("qdrant payload_convert failed"));
        assert!(err.source().is_some());
    }
}
