use std::str::FromStr;

use crate::error_handler::ConfigError;

/// Represents the provider (backend) used for model inference.
///
/// `OpenAI` covers every OpenAI-compatible REST API (OpenAI itself,
/// OpenRouter, vLLM, LiteLLM, ...), `Ollama` the local Ollama runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime for on-device inference.
    Ollama,
    /// OpenAI-compatible HTTP API.
    OpenAI,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(LlmProvider::Ollama),
            "openai" | "openrouter" | "chatgpt" => Ok(LlmProvider::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_aliases() {
        assert_eq!("Ollama".parse::<LlmProvider>().unwrap(), LlmProvider::Ollama);
        assert_eq!(" openrouter ".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAI);
        assert!("bedrock".parse::<LlmProvider>().is_err());
    }
}
