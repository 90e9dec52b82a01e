//! Application State
//!
//! Shared, read-only after start-up except for the session registry.

use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;
use vanguard_agent::SalesAgent;
use vanguard_config::Settings;

use crate::session::SessionManager;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub agent: Arc<SalesAgent>,
    pub sessions: Arc<SessionManager>,
    /// Present when the Prometheus recorder is installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Build state with a session manager sized from the server settings
    pub fn new(settings: Settings, agent: SalesAgent) -> Self {
        let sessions = SessionManager::with_config(
            settings.server.max_sessions,
            Duration::from_secs(settings.server.session_timeout_seconds),
            Duration::from_secs(settings.server.cleanup_interval_seconds),
        );

        Self {
            settings: Arc::new(settings),
            agent: Arc::new(agent),
            sessions: Arc::new(sessions),
            metrics_handle: None,
        }
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics_handle = handle;
        self
    }
}
