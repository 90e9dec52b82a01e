//! Core error types

use thiserror::Error;

/// Errors shared across the agent crates
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The generation service failed or refused the request.
    /// Transient from the caller's point of view: the same turn may be retried.
    #[error("Generation unavailable: {0}")]
    GenerationUnavailable(String),

    /// The generation service did not answer within the allowed time
    #[error("Generation timed out after {0}ms")]
    Timeout(u64),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::GenerationUnavailable(_) | Error::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
