//! LLM integration
//!
//! Features:
//! - OpenAI-compatible chat-completion backend (OpenAI, vLLM, llama.cpp, Ollama `/v1`)
//! - Prompt construction for the sales persona
//! - Adapter bridging `LlmBackend` to the core `LanguageModel` trait

pub mod adapter;
pub mod backend;
pub mod factory;
pub mod prompt;

pub use adapter::LanguageModelAdapter;
pub use backend::{
    FinishReason, GenerationOptions, GenerationResult, LlmBackend, LlmConfig, OpenAIBackend,
};
pub use factory::{create_backend, create_language_model};
pub use prompt::PromptBuilder;

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // reqwest does not report the configured duration
            LlmError::Timeout(0)
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for vanguard_core::Error {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout(ms) => vanguard_core::Error::Timeout(ms),
            LlmError::Configuration(msg) => vanguard_core::Error::Configuration(msg),
            LlmError::InvalidResponse(msg) => vanguard_core::Error::InvalidResponse(msg),
            other => vanguard_core::Error::GenerationUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let core: vanguard_core::Error = LlmError::Api("HTTP 503".into()).into();
        assert!(matches!(core, vanguard_core::Error::GenerationUnavailable(_)));

        let core: vanguard_core::Error = LlmError::Network("connection refused".into()).into();
        assert!(matches!(core, vanguard_core::Error::GenerationUnavailable(_)));

        let core: vanguard_core::Error = LlmError::Timeout(30_000).into();
        assert_eq!(core, vanguard_core::Error::Timeout(30_000));

        let core: vanguard_core::Error = LlmError::Configuration("no key".into()).into();
        assert!(matches!(core, vanguard_core::Error::Configuration(_)));
    }
}
