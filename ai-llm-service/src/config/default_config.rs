//! LLM configs derived from environment variables.
//!
//! Two roles are used by the backend:
//!
//! - **Synthesis** → OpenAI-compatible chat model picked per request. Only the
//!   transport settings come from env ([`SynthesisSettings`]); model and key
//!   always come from the caller.
//! - **Embedding** → one fixed model for the whole index ([`config_embedding`]).
//!
//! # Environment variables
//!
//! Synthesis:
//! - `LLM_BASE_URL`     = OpenAI-compatible base URL (default `https://openrouter.ai/api`)
//! - `LLM_TIMEOUT_SECS` = request timeout (default 120)
//! - `LLM_MAX_TOKENS`   = optional max tokens (u32)
//!
//! Embedding:
//! - `EMBEDDING_PROVIDER` = `ollama` | `openai` (default `ollama`)
//! - `EMBEDDING_MODEL`    = model name (default `all-minilm`)
//! - `EMBEDDING_URL`      = base URL; falls back to `OLLAMA_URL` / `OLLAMA_PORT`
//!   for Ollama and to `LLM_BASE_URL` for OpenAI-compatible providers
//! - `EMBEDDING_API_KEY`  = key for OpenAI-compatible providers

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, Result, env_opt, env_opt_u32, env_opt_u64,
        validate_http_endpoint,
    },
};

/// Fixed sampling temperature for answer synthesis (deterministic-leaning).
pub const SYNTHESIS_TEMPERATURE: f32 = 0.1;

/// Default OpenAI-compatible base URL (OpenRouter).
pub const DEFAULT_LLM_BASE_URL: &str = "https://openrouter.ai/api";

const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;
const DEFAULT_EMBEDDING_MODEL: &str = "all-minilm";

/// Transport settings shared by every synthesis client.
///
/// Loaded once at startup; [`SynthesisSettings::model_config`] then builds a
/// fresh [`LlmModelConfig`] for each request's model and key.
#[derive(Debug, Clone)]
pub struct SynthesisSettings {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub max_tokens: Option<u32>,
}

impl SynthesisSettings {
    /// Reads `LLM_BASE_URL`, `LLM_TIMEOUT_SECS` and `LLM_MAX_TOKENS`.
    pub fn from_env() -> Result<Self> {
        let endpoint = env_opt("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_LLM_BASE_URL.into());
        validate_http_endpoint("LLM_BASE_URL", &endpoint)?;

        Ok(Self {
            endpoint,
            timeout_secs: env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_LLM_TIMEOUT_SECS),
            max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        })
    }

    /// Builds a synthesis config for one request.
    ///
    /// # Errors
    /// [`ConfigError::EmptyModel`] if `model` is blank.
    pub fn model_config(&self, model: &str, api_key: &str) -> Result<LlmModelConfig> {
        let model = model.trim();
        if model.is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }

        Ok(LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: model.to_string(),
            endpoint: self.endpoint.clone(),
            api_key: Some(api_key.trim().to_string()),
            max_tokens: self.max_tokens,
            temperature: Some(SYNTHESIS_TEMPERATURE),
            top_p: None,
            timeout_secs: Some(self.timeout_secs),
        })
    }
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_LLM_BASE_URL.into(),
            timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            max_tokens: None,
        }
    }
}

/// Resolves the Ollama endpoint from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
/// 3. `http://localhost:11434`
fn ollama_endpoint() -> Result<String> {
    if let Some(url) = env_opt("OLLAMA_URL") {
        return Ok(url);
    }
    if let Some(port) = env_opt("OLLAMA_PORT") {
        port.trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{}", port.trim()));
    }
    Ok("http://localhost:11434".into())
}

/// Constructs the config for the **embedding** model.
///
/// # Defaults
/// - `temperature = Some(0.0)`
/// - `timeout_secs = Some(30)`
///
/// # Errors
/// - [`ConfigError::UnsupportedProvider`] for an unknown `EMBEDDING_PROVIDER`
/// - [`ConfigError::InvalidFormat`] if the resolved URL is not http(s)
pub fn config_embedding() -> Result<LlmModelConfig> {
    let provider = match env_opt("EMBEDDING_PROVIDER") {
        Some(p) => p.parse::<LlmProvider>().map_err(AiLlmError::from)?,
        None => LlmProvider::Ollama,
    };

    let endpoint = match (env_opt("EMBEDDING_URL"), provider) {
        (Some(url), _) => url,
        (None, LlmProvider::Ollama) => ollama_endpoint()?,
        (None, LlmProvider::OpenAI) => {
            env_opt("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_LLM_BASE_URL.into())
        }
    };
    validate_http_endpoint("EMBEDDING_URL", &endpoint)?;

    Ok(LlmModelConfig {
        provider,
        model: env_opt("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.into()),
        endpoint,
        api_key: env_opt("EMBEDDING_API_KEY"),
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(30),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesis_config_is_request_scoped() {
        let settings = SynthesisSettings::default();
        let a = settings.model_config("openai/gpt-4o-mini", "key-a").unwrap();
        let b = settings.model_config("deepseek/deepseek-chat", "key-b").unwrap();

        assert_eq!(a.model, "openai/gpt-4o-mini");
        assert_eq!(a.api_key.as_deref(), Some("key-a"));
        assert_eq!(b.api_key.as_deref(), Some("key-b"));
        assert_eq!(a.temperature, Some(SYNTHESIS_TEMPERATURE));
        assert_eq!(a.provider, LlmProvider::OpenAI);
    }

    #[test]
    fn blank_model_is_rejected() {
        let settings = SynthesisSettings::default();
        assert!(matches!(
            settings.model_config("   ", "k"),
            Err(AiLlmError::Config(ConfigError::EmptyModel))
        ));
    }
}
