//! Indexing: one document in, one vector point out.

use rag_store::{IndexableDocument, VectorPoint, normalize};
use tracing::{info, instrument};

use crate::RagEngine;
use crate::error::{ContextorError, Stage};

impl RagEngine {
    /// Embeds and stores `doc` under its external id, replacing any earlier
    /// revision. Returns the id.
    ///
    /// # Errors
    /// - [`ContextorError::InvalidArgument`] for a blank id, project or content
    /// - [`ContextorError::Indexing`] if embedding or the upsert fails
    #[instrument(skip_all, fields(id = %doc.id, project = %doc.project_id, source = doc.source.as_str()))]
    pub async fn index(&self, doc: &IndexableDocument) -> Result<String, ContextorError> {
        for (field, value) in [
            ("id", &doc.id),
            ("project_id", &doc.project_id),
            ("content", &doc.content),
        ] {
            if value.trim().is_empty() {
                return Err(ContextorError::InvalidArgument(format!(
                    "{field} must not be empty"
                )));
            }
        }

        let metadata = normalize::strip_nulls(doc.metadata());
        let text = normalize::embedding_text(&metadata, &doc.content);

        let vector = self
            .embedder
            .embed(&text)
            .await
            .map_err(|e| ContextorError::indexing(Stage::Embedding, e))?;

        self.store
            .upsert(VectorPoint {
                id: doc.id.clone(),
                project_id: doc.project_id.clone(),
                vector,
                content: doc.content.clone(),
                metadata,
            })
            .await
            .map_err(|e| ContextorError::indexing(Stage::Storage, e))?;

        info!("document indexed");
        Ok(doc.id.clone())
    }
}
