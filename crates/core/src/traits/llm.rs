//! Language Model traits

use async_trait::async_trait;

use crate::{GenerateRequest, GenerateResponse, Result};

/// Language Model interface
///
/// # Example
///
/// ```ignore
/// let llm: Arc<dyn LanguageModel> = Arc::new(LanguageModelAdapter::new(backend));
/// let request = GenerateRequest::new("Você é um vendedor experiente")
///     .with_user_message("Oi, tudo bem?");
/// let response = llm.generate(request).await?;
/// println!("{}", response.text);
/// ```
#[async_trait]
pub trait LanguageModel: Send + Sync + 'static {
    /// Generate completion
    ///
    /// Failures are reported as [`crate::Error::GenerationUnavailable`] or
    /// [`crate::Error::Timeout`]; implementations never return a partial text.
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    /// Check if model is available
    async fn is_available(&self) -> bool;

    /// Get model name for logging
    fn model_name(&self) -> &str;

    /// Estimate token count for text
    fn estimate_tokens(&self, text: &str) -> usize {
        text.chars().count().div_ceil(4)
    }
}
