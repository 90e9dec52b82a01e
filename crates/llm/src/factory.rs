//! LLM Factory
//!
//! Creates generation backends from settings.

use std::sync::Arc;
use std::time::Duration;

use vanguard_config::{LlmProvider, LlmSettings};
use vanguard_core::LanguageModel;

use crate::{
    adapter::LanguageModelAdapter,
    backend::{LlmBackend, LlmConfig, OpenAIBackend},
    LlmError,
};

impl From<&LlmSettings> for LlmConfig {
    fn from(settings: &LlmSettings) -> Self {
        let base = match settings.provider {
            LlmProvider::OpenAI => LlmConfig {
                api_key: settings.api_key.clone(),
                model: settings.model.clone(),
                ..Default::default()
            },
            LlmProvider::Local => LlmConfig::local(settings.resolved_endpoint(), &settings.model),
        };

        LlmConfig {
            endpoint: settings.resolved_endpoint(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            timeout: Duration::from_secs(settings.timeout_seconds),
            organization: settings.organization.clone(),
            ..base
        }
    }
}

/// Create a backend from settings
pub fn create_backend(settings: &LlmSettings) -> Result<Arc<dyn LlmBackend>, LlmError> {
    let config = LlmConfig::from(settings);

    tracing::info!(
        provider = ?settings.provider,
        endpoint = %config.endpoint,
        model = %config.model,
        temperature = config.temperature,
        "Creating LLM backend"
    );

    Ok(Arc::new(OpenAIBackend::new(config)?))
}

/// Create a backend from settings, wrapped as a core `LanguageModel`
pub fn create_language_model(settings: &LlmSettings) -> Result<Arc<dyn LanguageModel>, LlmError> {
    let backend = create_backend(settings)?;
    Ok(Arc::new(LanguageModelAdapter::from_arc(backend)))
}
