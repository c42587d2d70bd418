//! DevDoc core: tenant-scoped retrieval and answer synthesis.
//!
//! Public API: [`RagEngine`].
//! - [`RagEngine::index`] normalizes a document, embeds it and upserts it
//!   under its external id.
//! - [`RagEngine::query`] checks credential/model/tenant, builds the filter
//!   set and prompt template, retrieves top-K chunks, renders the prompt and
//!   asks a request-scoped synthesizer for the answer.
//!
//! Collaborators (vector store, embedder, synthesizer factory) are injected
//! as trait objects, so tests run the whole pipeline against in-memory stubs.

mod api_types;
mod error;
mod index;
pub mod llm;
pub mod prompt;
mod query;

pub use api_types::{DEFAULT_TOP_K, QueryAnswer, QuerySpec, RetrievedChunk};
pub use error::{ContextorError, Stage, UpstreamCause};
pub use llm::{OpenAiCompatFactory, Synthesizer, SynthesizerFactory};
pub use prompt::{DocStyle, DocType, PromptTemplate};

use std::sync::Arc;

use rag_store::{EmbeddingsProvider, VectorStore};

/// Stateless pipeline over shared collaborators.
///
/// Cheap to clone; every field is an `Arc`.
#[derive(Clone)]
pub struct RagEngine {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingsProvider>,
    synthesizers: Arc<dyn SynthesizerFactory>,
}

impl RagEngine {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingsProvider>,
        synthesizers: Arc<dyn SynthesizerFactory>,
    ) -> Self {
        Self {
            store,
            embedder,
            synthesizers,
        }
    }
}

/// `Some(trimmed)` when `v` is present and not blank.
pub(crate) fn present(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}
