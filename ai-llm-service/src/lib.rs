//! LLM provider clients shared by the DevDoc backend.
//!
//! - [`services::open_ai_service::OpenAiService`]: OpenAI-compatible REST
//!   (OpenRouter, OpenAI, vLLM, ...) for chat completion and embeddings.
//! - [`services::ollama_service::OllamaService`]: local Ollama embeddings.
//! - [`llm_client::LlmClient`]: provider-agnostic embedding wrapper built
//!   from a [`config::llm_model_config::LlmModelConfig`].
//!
//! Clients are cheap to construct and carry their whole configuration, so
//! callers build one per request whenever model or credentials vary per call.

pub mod config;
pub mod error_handler;
pub mod llm_client;
pub mod services;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, ConfigError, ProviderError, ProviderErrorKind};
pub use llm_client::LlmClient;
