//! Embedding provider backed by `ai-llm-service`.
//!
//! Works with any provider [`LlmClient`] supports (Ollama `/api/embeddings`
//! or OpenAI-compatible `/v1/embeddings`) and rejects vectors whose length
//! differs from the collection dimension.

use std::{future::Future, pin::Pin};

use ai_llm_service::{LlmClient, LlmModelConfig};
use tracing::{debug, instrument};

use crate::{EmbeddingsProvider, RagError};

/// Embedder with a fixed model and expected dimension.
pub struct LlmEmbedder {
    client: LlmClient,
    dim: usize,
}

impl LlmEmbedder {
    /// Builds the provider client for `cfg`.
    ///
    /// # Errors
    /// [`RagError::Embedding`] if the client config is rejected.
    pub fn new(cfg: LlmModelConfig, dim: usize) -> Result<Self, RagError> {
        let client = LlmClient::from_config(cfg)?;
        Ok(Self { client, dim })
    }
}

impl EmbeddingsProvider for LlmEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>> {
        Box::pin(self.embed_checked(text))
    }
}

impl LlmEmbedder {
    #[instrument(skip_all, fields(model = %self.client.model(), chars = text.len()))]
    async fn embed_checked(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let vector = self.client.embed(text).await?;
        check_dim(vector, self.dim)
    }
}

fn check_dim(vector: Vec<f32>, want: usize) -> Result<Vec<f32>, RagError> {
    if vector.len() != want {
        debug!(got = vector.len(), want, "embedding dimension mismatch");
        return Err(RagError::VectorSizeMismatch {
            got: vector.len(),
            want,
        });
    }
    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::LlmProvider;

    #[test]
    fn dimension_is_enforced() {
        assert_eq!(check_dim(vec![0.0; 3], 3).unwrap().len(), 3);
        assert!(matches!(
            check_dim(vec![0.0; 2], 3),
            Err(RagError::VectorSizeMismatch { got: 2, want: 3 })
        ));
    }

    #[test]
    fn invalid_endpoint_is_an_embedding_error() {
        let cfg = LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "all-minilm".into(),
            endpoint: "localhost:11434".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: None,
        };
        assert!(matches!(LlmEmbedder::new(cfg, 384), Err(RagError::Embedding(_))));
    }
}
