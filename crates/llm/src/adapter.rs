//! Language Model adapter
//!
//! Bridges the LlmBackend trait to the core LanguageModel trait,
//! allowing LLM backends to be used where LanguageModel is expected.

use std::sync::Arc;

use async_trait::async_trait;
use vanguard_core::{
    Error, FinishReason as CoreFinishReason, GenerateRequest, GenerateResponse, LanguageModel,
    Result, TokenUsage,
};

use crate::backend::{FinishReason as BackendFinishReason, GenerationOptions, LlmBackend};

/// Adapter that wraps an LlmBackend to implement the core LanguageModel trait.
///
/// Backend failures are folded into the core error vocabulary: network and API
/// errors become [`Error::GenerationUnavailable`], timeouts become
/// [`Error::Timeout`].
///
/// # Example
///
/// ```ignore
/// let backend = OpenAIBackend::new(LlmConfig::openai(key, "gpt-4o-mini"))?;
/// let model: Arc<dyn LanguageModel> = Arc::new(LanguageModelAdapter::new(backend));
/// ```
pub struct LanguageModelAdapter {
    backend: Arc<dyn LlmBackend>,
    model_name: String,
}

impl LanguageModelAdapter {
    /// Create a new adapter wrapping an LlmBackend
    pub fn new<B: LlmBackend + 'static>(backend: B) -> Self {
        let model_name = backend.model_name().to_string();
        Self {
            backend: Arc::new(backend),
            model_name,
        }
    }

    /// Create from an Arc'd backend
    pub fn from_arc(backend: Arc<dyn LlmBackend>) -> Self {
        let model_name = backend.model_name().to_string();
        Self {
            backend,
            model_name,
        }
    }

    /// Convert backend finish reason to core finish reason
    fn convert_finish_reason(reason: BackendFinishReason) -> CoreFinishReason {
        match reason {
            BackendFinishReason::Stop => CoreFinishReason::Stop,
            BackendFinishReason::Length => CoreFinishReason::Length,
            BackendFinishReason::Error => CoreFinishReason::Error,
        }
    }
}

#[async_trait]
impl LanguageModel for LanguageModelAdapter {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let options = GenerationOptions::from(&request);
        match self.backend.generate_with(&request.messages, &options).await {
            Ok(result) => Ok(GenerateResponse {
                text: result.text,
                finish_reason: Self::convert_finish_reason(result.finish_reason),
                usage: Some(TokenUsage::new(
                    result.prompt_tokens as u32,
                    result.tokens as u32,
                )),
            }),
            Err(e) => {
                tracing::warn!(model = %self.model_name, error = %e, "LLM generation failed");
                Err(Error::from(e))
            }
        }
    }

    async fn is_available(&self) -> bool {
        self.backend.is_available().await
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn estimate_tokens(&self, text: &str) -> usize {
        self.backend.estimate_tokens(text)
    }
}
