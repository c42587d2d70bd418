//! Provider-agnostic embedding client built from a single [`LlmModelConfig`].
//!
//! An [`LlmClient`] owns its whole configuration and is built once at
//! startup for the index's embedding model.

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// A ready-to-use client for one provider/model pair.
pub enum LlmClient {
    Ollama(OllamaService),
    OpenAI(OpenAiService),
}

impl LlmClient {
    /// Builds the provider-specific client for `cfg`.
    ///
    /// # Errors
    /// Propagates constructor validation from the provider service.
    pub fn from_config(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        match cfg.provider {
            LlmProvider::Ollama => OllamaService::new(cfg).map(LlmClient::Ollama),
            LlmProvider::OpenAI => OpenAiService::new(cfg).map(LlmClient::OpenAI),
        }
    }

    /// Model identifier this client talks to.
    pub fn model(&self) -> &str {
        match self {
            LlmClient::Ollama(s) => s.model(),
            LlmClient::OpenAI(s) => s.model(),
        }
    }

    /// Computes an embedding vector for `input`.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        match self {
            LlmClient::Ollama(s) => s.embeddings(input).await,
            LlmClient::OpenAI(s) => s.embeddings(input).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_on_provider() {
        let cfg = LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "all-minilm".into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: None,
        };
        let client = LlmClient::from_config(cfg).unwrap();
        assert!(matches!(client, LlmClient::Ollama(_)));
        assert_eq!(client.model(), "all-minilm");
    }
}
