//! Synthesis seam: request-scoped chat clients.
//!
//! A [`SynthesizerFactory`] turns `(model, credential)` into a fresh
//! [`Synthesizer`] for a single query. Nothing request-specific is kept in
//! shared state.

use std::{future::Future, pin::Pin};

use ai_llm_service::{
    AiLlmError, config::default_config::SynthesisSettings,
    services::open_ai_service::OpenAiService,
};
use tracing::{debug, instrument};

/// Boxed future returned by [`Synthesizer::generate`].
pub type SynthesisFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>>;

/// Produces the final answer text for a fully rendered prompt.
pub trait Synthesizer: Send + Sync {
    fn generate<'a>(&'a self, prompt: &'a str) -> SynthesisFuture<'a>;
}

/// Builds a [`Synthesizer`] bound to one model and credential.
pub trait SynthesizerFactory: Send + Sync {
    fn build(&self, model: &str, credential: &str) -> Result<Box<dyn Synthesizer>, AiLlmError>;
}

/// Factory for OpenAI-compatible endpoints (OpenRouter by default).
#[derive(Debug, Clone, Default)]
pub struct OpenAiCompatFactory {
    settings: SynthesisSettings,
}

impl OpenAiCompatFactory {
    pub fn new(settings: SynthesisSettings) -> Self {
        Self { settings }
    }
}

impl SynthesizerFactory for OpenAiCompatFactory {
    fn build(&self, model: &str, credential: &str) -> Result<Box<dyn Synthesizer>, AiLlmError> {
        let cfg = self.settings.model_config(model, credential)?;
        debug!(model = %cfg.model, endpoint = %cfg.endpoint, "building synthesis client");
        let client = OpenAiService::new(cfg)?;
        Ok(Box::new(ClientSynthesizer { client }))
    }
}

struct ClientSynthesizer {
    client: OpenAiService,
}

impl ClientSynthesizer {
    #[instrument(skip_all, fields(model = %self.client.model(), prompt_chars = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String, AiLlmError> {
        self.client.generate(prompt).await
    }
}

impl Synthesizer for ClientSynthesizer {
    fn generate<'a>(&'a self, prompt: &'a str) -> SynthesisFuture<'a> {
        Box::pin(self.complete(prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_model_is_rejected() {
        let f = OpenAiCompatFactory::default();
        assert!(f.build("  ", "sk-or-test").is_err());
    }

    #[test]
    fn blank_credential_is_rejected() {
        let f = OpenAiCompatFactory::default();
        assert!(f.build("openai/gpt-4o-mini", " ").is_err());
    }

    #[test]
    fn builds_for_model_and_key() {
        let f = OpenAiCompatFactory::default();
        assert!(f.build("openai/gpt-4o-mini", "sk-or-test").is_ok());
    }
}
