//! Vector store seam consumed by the indexing and query pipelines.

use std::{future::Future, pin::Pin};

use crate::errors::RagError;
use crate::filters::FilterSet;
use crate::record::{SearchHit, VectorPoint};

/// Boxed future returned by [`VectorStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RagError>> + Send + 'a>>;

/// Backend-agnostic vector index.
///
/// Implementations must be `Send + Sync`; the engine shares one instance
/// across all request tasks.
pub trait VectorStore: Send + Sync {
    /// Inserts `point`, replacing any point with the same external id.
    fn upsert<'a>(&'a self, point: VectorPoint) -> StoreFuture<'a, ()>;

    /// Returns at most `top_k` hits matching every clause of `filter`,
    /// most similar first.
    fn search<'a>(
        &'a self,
        vector: Vec<f32>,
        filter: &'a FilterSet,
        top_k: u64,
    ) -> StoreFuture<'a, Vec<SearchHit>>;
}
