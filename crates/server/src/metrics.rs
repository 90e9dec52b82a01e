//! Prometheus metrics
//!
//! Recorded through the `metrics` facade and exported with
//! `metrics-exporter-prometheus` at `/metrics`.

use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use vanguard_agent::FunnelStage;

use crate::state::AppState;

pub const TURNS_TOTAL: &str = "vanguard_turns_total";
pub const FORCED_OFFERS_TOTAL: &str = "vanguard_forced_offers_total";
pub const BANNERS_SHOWN_TOTAL: &str = "vanguard_offer_banners_total";
pub const GENERATION_FAILURES_TOTAL: &str = "vanguard_generation_failures_total";
pub const GENERATION_LATENCY_SECONDS: &str = "vanguard_generation_latency_seconds";
pub const SESSIONS_CREATED_TOTAL: &str = "vanguard_sessions_created_total";

/// Install the global Prometheus recorder.
///
/// Returns `None` if a recorder is already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install Prometheus recorder");
            None
        }
    }
}

/// Completed turn, labelled by the stage it ran in
pub fn record_turn(stage: FunnelStage) {
    metrics::counter!(TURNS_TOTAL, "stage" => stage.as_str()).increment(1);
}

pub fn record_forced_offer() {
    metrics::counter!(FORCED_OFFERS_TOTAL).increment(1);
}

pub fn record_banner_shown() {
    metrics::counter!(BANNERS_SHOWN_TOTAL).increment(1);
}

/// Failed or timed-out generation; `kind` is `unavailable` or `timeout`
pub fn record_generation_failure(kind: &'static str) {
    metrics::counter!(GENERATION_FAILURES_TOTAL, "kind" => kind).increment(1);
}

pub fn record_generation_latency(elapsed: Duration) {
    metrics::histogram!(GENERATION_LATENCY_SECONDS).record(elapsed.as_secs_f64());
}

pub fn record_session_created() {
    metrics::counter!(SESSIONS_CREATED_TOTAL).increment(1);
}

/// `GET /metrics`
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics_handle {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}
