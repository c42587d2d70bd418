//! Typed error for the contextor crate.

use std::fmt;

use ai_llm_service::AiLlmError;
use rag_store::RagError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextorError {
    /// Malformed request (blank id/content/query, `top_k == 0`, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No provider credential was supplied with the query.
    #[error("missing credential for the synthesis provider")]
    MissingCredential,

    /// No synthesis model was selected for the query.
    #[error("missing synthesis model id")]
    MissingModel,

    /// No `project_id` was supplied, so the query cannot be tenant-scoped.
    #[error("missing project_id")]
    MissingTenant,

    /// Retrieval or synthesis failed; nothing is returned.
    #[error("upstream failure during {stage}: {source}")]
    Upstream {
        stage: Stage,
        #[source]
        source: UpstreamCause,
    },

    /// Embedding or storing a document failed.
    #[error("indexing failed during {stage}: {source}")]
    Indexing {
        stage: Stage,
        #[source]
        source: UpstreamCause,
    },
}

/// Pipeline step an upstream error came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Embedding,
    Retrieval,
    Synthesis,
    Storage,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Embedding => "embedding",
            Stage::Retrieval => "retrieval",
            Stage::Synthesis => "synthesis",
            Stage::Storage => "storage",
        };
        f.write_str(s)
    }
}

/// Collaborator error wrapped by [`ContextorError::Upstream`] and
/// [`ContextorError::Indexing`].
#[derive(Debug, Error)]
pub enum UpstreamCause {
    #[error(transparent)]
    Rag(#[from] RagError),

    #[error(transparent)]
    Llm(#[from] AiLlmError),
}

impl ContextorError {
    pub(crate) fn upstream(stage: Stage, source: impl Into<UpstreamCause>) -> Self {
        Self::Upstream {
            stage,
            source: source.into(),
        }
    }

    pub(crate) fn indexing(stage: Stage, source: impl Into<UpstreamCause>) -> Self {
        Self::Indexing {
            stage,
            source: source.into(),
        }
    }
}
