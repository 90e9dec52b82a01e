//! Configuration management for the sales agent
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default`, `config/{env}`)
//! - Environment variables (`VANGUARD__` prefix, `__` separator)
//!
//! Product price and purchase URL have no compiled default. They must be
//! provided by a file or the environment, otherwise [`Settings::validate`]
//! rejects the configuration.

pub mod agent;
pub mod constants;
pub mod settings;

pub use agent::{
    BannerConfig, FunnelConfig, FunnelThresholds, OfferConfig, PersonaConfig, StageContext,
};
pub use settings::{
    load_settings, load_settings_from, LlmProvider, LlmSettings, ObservabilityConfig,
    RuntimeEnvironment, ServerConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => ConfigError::MissingField(key),
            other => ConfigError::ParseError(other.to_string()),
        }
    }
}
