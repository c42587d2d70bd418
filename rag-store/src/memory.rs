//! In-memory [`VectorStore`] for tests and local runs.
//!
//! Points live in a `Vec` behind `std::sync::RwLock`. Search is brute-force
//! cosine similarity over every point that passes the filter set.

use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::errors::RagError;
use crate::filters::FilterSet;
use crate::record::{SearchHit, VectorPoint};
use crate::store::{StoreFuture, VectorStore};

/// In-memory vector index keyed by `(project_id, id)`.
pub struct InMemoryStore {
    points: RwLock<Vec<VectorPoint>>,
    dim: Option<usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            points: RwLock::new(Vec::new()),
            dim: None,
        }
    }

    /// Store that rejects vectors whose length is not `dim`.
    pub fn with_dimension(dim: usize) -> Self {
        Self {
            points: RwLock::new(Vec::new()),
            dim: Some(dim),
        }
    }

    pub fn len(&self) -> usize {
        self.points
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored copy of the point `id` in `project_id`, if any.
    pub fn get(&self, project_id: &str, id: &str) -> Option<VectorPoint> {
        self.points
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|p| p.project_id == project_id && p.id == id)
            .cloned()
    }

    fn upsert_sync(&self, point: VectorPoint) -> Result<(), RagError> {
        if let Some(want) = self.dim {
            if point.vector.len() != want {
                return Err(RagError::VectorSizeMismatch {
                    got: point.vector.len(),
                    want,
                });
            }
        }

        let mut points = self.points.write().unwrap_or_else(PoisonError::into_inner);
        points.retain(|p| !(p.project_id == point.project_id && p.id == point.id));
        debug!(key = %point.point_key(), total = points.len() + 1, "memory::upsert");
        points.push(point);
        Ok(())
    }

    fn search_sync(&self, vector: &[f32], filter: &FilterSet, top_k: u64) -> Vec<SearchHit> {
        let points = self.points.read().unwrap_or_else(PoisonError::into_inner);

        let mut scored: Vec<(f32, &VectorPoint)> = points
            .iter()
            .filter(|p| filter.matches(&p.metadata))
            .map(|p| (cosine_sim(vector, &p.vector), p))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(usize::try_from(top_k).unwrap_or(usize::MAX));

        debug!(hits = scored.len(), "memory::search");
        scored
            .into_iter()
            .map(|(score, p)| SearchHit {
                id: p.id.clone(),
                content: p.content.clone(),
                score: Some(score),
                metadata: p.metadata.clone(),
            })
            .collect()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn cosine_sim(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a < f32::EPSILON || mag_b < f32::EPSILON {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}

impl VectorStore for InMemoryStore {
    fn upsert<'a>(&'a self, point: VectorPoint) -> StoreFuture<'a, ()> {
        let res = self.upsert_sync(point);
        Box::pin(async move { res })
    }

    fn search<'a>(
        &'a self,
        vector: Vec<f32>,
        filter: &'a FilterSet,
        top_k: u64,
    ) -> StoreFuture<'a, Vec<SearchHit>> {
        Box::pin(async move { Ok(self.search_sync(&vector, filter, top_k)) })
    }
}
