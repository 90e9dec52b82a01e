//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{llm, sessions};
use crate::{ConfigError, FunnelConfig, OfferConfig, PersonaConfig};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation
    #[default]
    Development,
    /// Staging mode
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
///
/// Read-only after start-up.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Generation service configuration
    #[serde(default)]
    pub llm: LlmSettings,

    /// Price, purchase URL and banner copy
    #[serde(default)]
    pub offer: OfferConfig,

    /// Funnel heuristics
    #[serde(default)]
    pub funnel: FunnelConfig,

    /// Persona and product knowledge
    #[serde(default)]
    pub persona: PersonaConfig,

    /// Logging and metrics
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_offer()?;
        self.validate_funnel()?;
        self.validate_llm()?;
        self.validate_server()?;
        Ok(())
    }

    fn validate_offer(&self) -> Result<(), ConfigError> {
        if self.offer.price.trim().is_empty() {
            return Err(ConfigError::MissingField("offer.price".to_string()));
        }
        if self.offer.url.trim().is_empty() {
            return Err(ConfigError::MissingField("offer.url".to_string()));
        }
        if !self.offer.url.starts_with("http://") && !self.offer.url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "offer.url".to_string(),
                message: format!("Expected an http(s) URL, got '{}'", self.offer.url),
            });
        }
        Ok(())
    }

    fn validate_funnel(&self) -> Result<(), ConfigError> {
        if self.funnel.history_window_turns == 0 {
            return Err(ConfigError::InvalidValue {
                field: "funnel.history_window_turns".to_string(),
                message: "History window must hold at least one turn".to_string(),
            });
        }

        let has_keyword = |list: &[String]| list.iter().any(|k| !k.trim().is_empty());
        if !has_keyword(&self.funnel.interest_keywords) {
            return Err(ConfigError::InvalidValue {
                field: "funnel.interest_keywords".to_string(),
                message: "Keyword set cannot be empty".to_string(),
            });
        }
        if !has_keyword(&self.funnel.purchase_keywords) {
            return Err(ConfigError::InvalidValue {
                field: "funnel.purchase_keywords".to_string(),
                message: "Keyword set cannot be empty".to_string(),
            });
        }

        if self.persona.greeting.trim().is_empty() {
            return Err(ConfigError::MissingField("persona.greeting".to_string()));
        }
        Ok(())
    }

    fn validate_llm(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", self.llm.temperature),
            });
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::MissingField("llm.model".to_string()));
        }
        if self.llm.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.timeout_seconds".to_string(),
                message: "Timeout cannot be zero".to_string(),
            });
        }

        if self.environment.is_production()
            && self.llm.provider == LlmProvider::OpenAI
            && self.llm.api_key.as_deref().map_or(true, |k| k.trim().is_empty())
        {
            return Err(ConfigError::MissingField("llm.api_key".to_string()));
        }
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }
        if self.server.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_sessions".to_string(),
                message: "Max sessions cannot be 0".to_string(),
            });
        }
        if self.server.session_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.session_timeout_seconds".to_string(),
                message: "Session timeout cannot be 0".to_string(),
            });
        }
        if self.environment.is_production()
            && self.server.cors_enabled
            && !self.server.cors_origins.iter().any(|o| !o.trim().is_empty())
        {
            return Err(ConfigError::MissingField("server.cors_origins".to_string()));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum concurrent sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Idle time before a session is evicted
    #[serde(default = "default_session_timeout")]
    pub session_timeout_seconds: u64,

    /// Interval between eviction sweeps
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed origins. Empty allows any origin in development only.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_max_sessions() -> usize {
    sessions::MAX_SESSIONS
}
fn default_session_timeout() -> u64 {
    sessions::IDLE_TIMEOUT_SECS
}
fn default_cleanup_interval() -> u64 {
    sessions::CLEANUP_INTERVAL_SECS
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_sessions: default_max_sessions(),
            session_timeout_seconds: default_session_timeout(),
            cleanup_interval_seconds: default_cleanup_interval(),
            cors_enabled: default_true(),
            cors_origins: Vec::new(),
        }
    }
}

/// Generation backend flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI API (requires key)
    #[default]
    OpenAI,
    /// Local OpenAI-compatible server (no key)
    Local,
}

/// Generation service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default)]
    pub provider: LlmProvider,

    /// API base URL; defaults per provider when unset
    #[serde(default)]
    pub endpoint: Option<String>,

    /// API key. Falls back to `OPENAI_API_KEY` at load time.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default)]
    pub max_tokens: Option<usize>,

    /// Upper bound for one generation call
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u64,

    #[serde(default)]
    pub organization: Option<String>,
}

fn default_model() -> String {
    llm::DEFAULT_MODEL.to_string()
}
fn default_temperature() -> f32 {
    llm::DEFAULT_TEMPERATURE
}
fn default_llm_timeout() -> u64 {
    llm::DEFAULT_TIMEOUT_SECS
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            endpoint: None,
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            timeout_seconds: default_llm_timeout(),
            organization: None,
        }
    }
}

impl LlmSettings {
    /// Endpoint to use, resolving the provider default
    pub fn resolved_endpoint(&self) -> String {
        match (&self.endpoint, self.provider) {
            (Some(endpoint), _) if !endpoint.trim().is_empty() => {
                endpoint.trim_end_matches('/').to_string()
            }
            (_, LlmProvider::OpenAI) => llm::OPENAI_ENDPOINT.to_string(),
            (_, LlmProvider::Local) => llm::LOCAL_ENDPOINT.to_string(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (overridden by `RUST_LOG`)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Values stay strings until deserialization, so a price such as `19.90`
/// is kept verbatim while numeric fields still convert.
fn env_source() -> Environment {
    Environment::with_prefix("VANGUARD").separator("__")
}

fn finish(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Settings, ConfigError> {
    let config = builder.build()?;
    let mut settings: Settings = config.try_deserialize()?;

    if settings.llm.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
        settings.llm.api_key = std::env::var(llm::API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty());
    }

    settings.validate()?;

    tracing::debug!(
        environment = ?settings.environment,
        model = %settings.llm.model,
        window = settings.funnel.history_window_turns,
        "Settings loaded"
    );

    Ok(settings)
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (`VANGUARD__` prefix, e.g. `VANGUARD__OFFER__PRICE`)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
/// 4. Compiled defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(env_source());

    finish(builder)
}

/// Load settings from an explicit file, with environment overrides on top
pub fn load_settings_from(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let builder = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(env_source());

    finish(builder)
}
