//! Retrieval + synthesis for one question.

use rag_store::{FilterSet, RagError, SearchHit, normalize};
use tracing::{debug, info, instrument, warn};

use crate::api_types::{QueryAnswer, QuerySpec, RetrievedChunk};
use crate::error::{ContextorError, Stage};
use crate::prompt::PromptTemplate;
use crate::{RagEngine, present};

impl RagEngine {
    /// Answers `spec` from the project's indexed chunks.
    ///
    /// Preconditions are checked before any external call, in this order:
    /// credential, model, project, then `top_k > 0` and a non-blank question.
    ///
    /// # Errors
    /// - [`ContextorError::MissingCredential`] / [`ContextorError::MissingModel`] /
    ///   [`ContextorError::MissingTenant`] for absent or blank values
    /// - [`ContextorError::InvalidArgument`] for `top_k == 0` or an empty question
    /// - [`ContextorError::Upstream`] if embedding, search or synthesis fails;
    ///   no partial result is returned
    #[instrument(skip_all, fields(project = ?spec.project_id, top_k = spec.top_k, doc_type = %spec.doc_type))]
    pub async fn query(&self, spec: &QuerySpec) -> Result<QueryAnswer, ContextorError> {
        let credential =
            present(spec.credential.as_deref()).ok_or(ContextorError::MissingCredential)?;
        let model = present(spec.model_id.as_deref()).ok_or(ContextorError::MissingModel)?;
        let project = present(spec.project_id.as_deref()).ok_or(ContextorError::MissingTenant)?;
        if spec.top_k == 0 {
            return Err(ContextorError::InvalidArgument("top_k must be > 0".into()));
        }
        if spec.query_text.trim().is_empty() {
            return Err(ContextorError::InvalidArgument("query must not be empty".into()));
        }

        let filter = FilterSet::build(project, &spec.extra_filters).map_err(|e| match e {
            RagError::InvalidArgument(msg) => ContextorError::InvalidArgument(msg),
            other => ContextorError::upstream(Stage::Retrieval, other),
        })?;
        let template = PromptTemplate::for_query(&spec.doc_type, &spec.doc_style);

        debug!(model, credential_len = credential.len(), "building synthesizer");
        let synthesizer = self
            .synthesizers
            .build(model, credential)
            .map_err(|e| ContextorError::upstream(Stage::Synthesis, e))?;

        let vector = self
            .embedder
            .embed(&spec.query_text)
            .await
            .map_err(|e| ContextorError::upstream(Stage::Embedding, e))?;

        let hits = self
            .store
            .search(vector, &filter, spec.top_k)
            .await
            .map_err(|e| ContextorError::upstream(Stage::Retrieval, e))?;
        debug!(hits = hits.len(), "retrieved");
        if hits.is_empty() {
            warn!("no chunks matched the filter set");
        }

        let context = normalize::llm_context(hits.iter().map(|h| (&h.metadata, h.content.as_str())));
        let prompt = template.render(&context, &spec.query_text);

        let answer = synthesizer
            .generate(&prompt)
            .await
            .map_err(|e| ContextorError::upstream(Stage::Synthesis, e))?;

        info!(chunks = hits.len(), answer_chars = answer.len(), "query answered");
        Ok(QueryAnswer {
            answer,
            chunks: hits.into_iter().map(to_chunk).collect(),
        })
    }
}

/// Caller-facing chunk; excluded keys stay in the store only.
fn to_chunk(hit: SearchHit) -> RetrievedChunk {
    let mut metadata = hit.metadata;
    metadata.retain(|k, _| !normalize::is_excluded(k));
    RetrievedChunk {
        id: hit.id,
        content: hit.content,
        score: hit.score.unwrap_or(0.0),
        metadata,
    }
}
