//! Vanguard Server
//!
//! JSON-over-HTTP boundary for the sales agent: session lifecycle, chat turns,
//! health and Prometheus metrics.

pub mod http;
pub mod metrics;
pub mod session;
pub mod state;

pub use http::create_router;
pub use crate::metrics::{
    init_metrics, record_banner_shown, record_forced_offer, record_generation_failure,
    record_generation_latency, record_session_created, record_turn,
};
pub use session::{SessionEntry, SessionManager};
pub use state::AppState;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use vanguard_agent::AgentError;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Session capacity reached ({0})")]
    CapacityExceeded(usize),

    #[error("Generation unavailable: {0}")]
    GenerationUnavailable(String),

    #[error("Generation timed out after {0}ms")]
    Timeout(u64),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::CapacityExceeded(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::GenerationUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the client may resubmit the same request
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ServerError::GenerationUnavailable(_) | ServerError::Timeout(_)
        )
    }
}

impl From<AgentError> for ServerError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::GenerationUnavailable(msg) => ServerError::GenerationUnavailable(msg),
            AgentError::Timeout(ms) => ServerError::Timeout(ms),
            AgentError::Configuration(msg) => ServerError::Internal(msg),
        }
    }
}

impl From<ServerError> for StatusCode {
    fn from(err: ServerError) -> Self {
        err.status_code()
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({
            "error": self.to_string(),
            "retryable": self.is_retryable(),
        }));
        (status, body).into_response()
    }
}
