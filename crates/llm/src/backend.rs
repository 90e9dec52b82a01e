//! LLM Backend implementations
//!
//! A single OpenAI-compatible chat-completion backend covers the hosted
//! OpenAI API as well as local servers exposing the same `/chat/completions`
//! contract. Calls are made once; retry policy belongs to the caller.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use vanguard_config::constants::llm as defaults;
use vanguard_core::{GenerateRequest, Message, Role};

use crate::LlmError;

/// LLM configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API base (e.g. https://api.openai.com/v1)
    pub endpoint: String,
    /// API key; required for remote endpoints
    pub api_key: Option<String>,
    /// Model name/ID
    pub model: String,
    /// Maximum tokens to generate (server default when unset)
    pub max_tokens: Option<usize>,
    /// Temperature (0-2)
    pub temperature: f32,
    /// Top-p sampling
    pub top_p: Option<f32>,
    /// Request timeout
    pub timeout: Duration,
    /// Organization ID (OpenAI specific)
    pub organization: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::OPENAI_ENDPOINT.to_string(),
            api_key: None,
            model: defaults::DEFAULT_MODEL.to_string(),
            max_tokens: None,
            temperature: defaults::DEFAULT_TEMPERATURE,
            top_p: None,
            timeout: Duration::from_secs(defaults::DEFAULT_TIMEOUT_SECS),
            organization: None,
        }
    }
}

impl LlmConfig {
    /// Create config for OpenAI
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            model: model.into(),
            ..Default::default()
        }
    }

    /// Create config for a local OpenAI-compatible server (vLLM, llama.cpp, Ollama)
    pub fn local(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether the endpoint points at this machine
    pub fn is_local(&self) -> bool {
        let host = self
            .endpoint
            .trim_start_matches("http://")
            .trim_start_matches("https://");
        host.starts_with("localhost") || host.starts_with("127.0.0.1") || host.starts_with("[::1]")
    }
}

/// LLM generation result
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Generated text
    pub text: String,
    /// Prompt tokens reported by the server
    pub prompt_tokens: usize,
    /// Completion tokens reported by the server
    pub tokens: usize,
    /// Total generation time (ms)
    pub total_time_ms: u64,
    /// Finish reason
    pub finish_reason: FinishReason,
}

/// Finish reason
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    Length,
    Error,
}

impl FinishReason {
    fn from_openai(reason: Option<&str>) -> Self {
        match reason {
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::Error,
            _ => FinishReason::Stop,
        }
    }
}

/// Per-call sampling overrides; unset fields fall back to the backend config
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
}

impl From<&GenerateRequest> for GenerationOptions {
    fn from(request: &GenerateRequest) -> Self {
        Self {
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

/// LLM Backend trait
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generate a response with the configured sampling settings
    async fn generate(&self, messages: &[Message]) -> Result<GenerationResult, LlmError> {
        self.generate_with(messages, &GenerationOptions::default())
            .await
    }

    /// Generate a response, overriding sampling settings for this call
    async fn generate_with(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<GenerationResult, LlmError>;

    /// Check if model is available
    async fn is_available(&self) -> bool;

    /// Get model name
    fn model_name(&self) -> &str;

    /// Estimate tokens (~4 chars per token for Latin-script text)
    fn estimate_tokens(&self, text: &str) -> usize {
        text.chars().count().div_ceil(4)
    }
}

/// OpenAI-compatible backend
///
/// Works with:
/// - OpenAI (gpt-4o-mini, gpt-4o)
/// - vLLM, llama.cpp server
/// - Ollama's OpenAI-compatible `/v1` API
pub struct OpenAIBackend {
    config: LlmConfig,
    client: Client,
}

impl OpenAIBackend {
    /// Create new OpenAI backend
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let has_key = config
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty());
        if !has_key && !config.is_local() {
            return Err(LlmError::Configuration(
                "API key required for remote endpoints".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Get the full API URL for chat completions
    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }

    /// Build request headers
    fn build_headers(&self) -> reqwest::header::HeaderMap {
        use reqwest::header::HeaderValue;

        let mut headers = reqwest::header::HeaderMap::new();

        if let Some(ref key) = self.config.api_key {
            let auth_value = format!("Bearer {}", key);
            if let Ok(val) = HeaderValue::from_str(&auth_value) {
                headers.insert(reqwest::header::AUTHORIZATION, val);
            }
        }

        if let Some(ref org) = self.config.organization {
            if let Ok(val) = HeaderValue::from_str(org) {
                headers.insert("OpenAI-Organization", val);
            }
        }

        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        headers
    }

    fn build_request(&self, messages: &[Message], options: &GenerationOptions) -> OpenAIChatRequest {
        OpenAIChatRequest {
            model: self.config.model.clone(),
            messages: messages.iter().map(OpenAIMessage::from).collect(),
            max_tokens: options.max_tokens.or(self.config.max_tokens),
            temperature: Some(options.temperature.unwrap_or(self.config.temperature)),
            top_p: self.config.top_p,
            stream: Some(false),
        }
    }

    fn request_error(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(self.config.timeout.as_millis() as u64)
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl LlmBackend for OpenAIBackend {
    async fn generate_with(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<GenerationResult, LlmError> {
        let start = Instant::now();
        let request = self.build_request(messages, options);

        let response = self
            .client
            .post(self.chat_url())
            .headers(self.build_headers())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = %status,
                model = %self.config.model,
                "Chat completion rejected"
            );
            return Err(LlmError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        let response: OpenAIChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.request_error(e)
            } else {
                LlmError::InvalidResponse(e.to_string())
            }
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?;

        let total_time_ms = start.elapsed().as_millis() as u64;
        let (prompt_tokens, tokens) = response
            .usage
            .map(|u| (u.prompt_tokens, u.completion_tokens))
            .unwrap_or((0, 0));

        tracing::debug!(
            model = %self.config.model,
            prompt_tokens,
            completion_tokens = tokens,
            total_time_ms,
            "Chat completion finished"
        );

        Ok(GenerationResult {
            text: choice.message.content.unwrap_or_default(),
            prompt_tokens,
            tokens,
            total_time_ms,
            finish_reason: FinishReason::from_openai(choice.finish_reason.as_deref()),
        })
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/models", self.config.endpoint.trim_end_matches('/'));
        self.client
            .get(&url)
            .headers(self.build_headers())
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// OpenAI API types
#[derive(Debug, Serialize)]
struct OpenAIChatRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

impl From<&Message> for OpenAIMessage {
    fn from(msg: &Message) -> Self {
        let role = match msg.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        Self {
            role: role.to_string(),
            content: Some(msg.content.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIChatResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
}
