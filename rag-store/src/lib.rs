//! Tenant-scoped vector storage for DevDoc.
//!
//! This crate provides:
//! - [`FilterSet`]: ANDed equality filters that always start with the
//!   `project_id` clause
//! - document records and metadata normalization (null stripping, excluded
//!   keys, embedding/LLM text views)
//! - the [`VectorStore`] seam with a Qdrant backend ([`QdrantStore`]) and an
//!   in-memory backend ([`InMemoryStore`])
//! - the [`EmbeddingsProvider`] seam with an `ai-llm-service` backed
//!   implementation ([`LlmEmbedder`])

mod config;
mod embed;
mod errors;
mod filters;
mod memory;
pub mod normalize;
mod qdrant_facade;
mod record;
mod store;

pub use config::{DistanceKind, RagConfig, StoreBackend, VectorSpace};
pub use embed::{EmbeddingsProvider, llm_embedder::LlmEmbedder};
pub use errors::RagError;
pub use filters::{FilterClause, FilterSet, PROJECT_KEY, to_qdrant_filter};
pub use memory::InMemoryStore;
pub use qdrant_facade::{CONTENT_KEY, QdrantStore};
pub use record::{DocumentSource, IndexableDocument, SearchHit, VectorPoint};
pub use store::{StoreFuture, VectorStore};

use std::sync::Arc;

use tracing::info;

/// Builds the vector store selected by `cfg.backend`.
///
/// For Qdrant the collection is created if missing.
///
/// # Errors
/// Config or Qdrant errors from [`QdrantStore`].
pub async fn connect(cfg: &RagConfig) -> Result<Arc<dyn VectorStore>, RagError> {
    match cfg.backend {
        StoreBackend::Memory => {
            info!(dim = cfg.space.size, "vector store: in-memory");
            Ok(Arc::new(InMemoryStore::with_dimension(cfg.space.size)))
        }
        StoreBackend::Qdrant => {
            info!(url = %cfg.qdrant_url, collection = %cfg.collection, "vector store: qdrant");
            let store = QdrantStore::new(cfg)?;
            store.ensure_collection().await?;
            Ok(Arc::new(store))
        }
    }
}
