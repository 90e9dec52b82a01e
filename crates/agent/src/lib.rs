//! Sales funnel agent
//!
//! Features:
//! - Keyword-based interest and purchase-intent detection
//! - Funnel stage tracking (rapport, qualify, close)
//! - Stage-annotated prompting over a bounded history window
//! - Forced call-to-action and offer banner decisions
//! - Failure-safe turns: counters and history change only on success

pub mod agent;
pub mod funnel;
pub mod keywords;
pub mod offer;
pub mod session;

pub use agent::{AgentReply, SalesAgent, SalesAgentConfig};
pub use funnel::{FunnelRules, FunnelSnapshot, FunnelStage, FunnelTracker};
pub use keywords::KeywordSet;
pub use offer::{OfferBanner, OfferPolicy};
pub use session::Session;

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    /// The generation service failed; the turn was not recorded
    #[error("Generation unavailable: {0}")]
    GenerationUnavailable(String),

    /// The generation service did not answer in time; the turn was not recorded
    #[error("Generation timed out after {0}ms")]
    Timeout(u64),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AgentError {
    /// Whether the same input may be submitted again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AgentError::GenerationUnavailable(_) | AgentError::Timeout(_)
        )
    }
}

impl From<vanguard_core::Error> for AgentError {
    fn from(err: vanguard_core::Error) -> Self {
        match err {
            vanguard_core::Error::GenerationUnavailable(msg) => {
                AgentError::GenerationUnavailable(msg)
            }
            vanguard_core::Error::InvalidResponse(msg) => AgentError::GenerationUnavailable(msg),
            vanguard_core::Error::Timeout(ms) => AgentError::Timeout(ms),
            vanguard_core::Error::Configuration(msg) => AgentError::Configuration(msg),
        }
    }
}

impl From<vanguard_llm::LlmError> for AgentError {
    fn from(err: vanguard_llm::LlmError) -> Self {
        AgentError::from(vanguard_core::Error::from(err))
    }
}
