//! HTTP Endpoints
//!
//! REST API for the sales agent.

use std::time::Instant;

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use vanguard_agent::{AgentError, FunnelSnapshot, OfferBanner, Session};
use vanguard_core::Turn;

use crate::metrics;
use crate::state::AppState;
use crate::ServerError;

const FALLBACK_ORIGIN: &str = "http://localhost:3000";

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.settings.server.cors_origins,
        state.settings.server.cors_enabled,
    );

    Router::new()
        .route("/api/sessions", post(create_session).get(list_sessions))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        .route("/api/chat/:session_id", post(chat))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - disabled: permissive (development only)
/// - no valid origins: localhost:3000
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::info!("No valid CORS origins configured, defaulting to {}", FALLBACK_ORIGIN);
        return CorsLayer::new()
            .allow_origin(HeaderValue::from_static(FALLBACK_ORIGIN))
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any);
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

/// Session view returned by the session endpoints
#[derive(Debug, Serialize)]
struct SessionResponse {
    session_id: String,
    history: Vec<Turn>,
    #[serde(flatten)]
    funnel: FunnelSnapshot,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id().to_string(),
            history: session.history().to_vec(),
            funnel: session.snapshot(),
        }
    }
}

/// Start a conversation; the history holds the greeting
async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionResponse>), ServerError> {
    let entry = state.sessions.create(state.agent.new_session())?;
    metrics::record_session_created();

    let session = entry.lock().await;
    Ok((StatusCode::CREATED, Json(SessionResponse::from(&*session))))
}

/// Get session info
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ServerError> {
    let entry = state
        .sessions
        .get(&id)
        .ok_or_else(|| ServerError::SessionNotFound(id.clone()))?;

    let session = entry.lock().await;
    // Polling counts as activity
    entry.touch();
    Ok(Json(SessionResponse::from(&*session)))
}

/// Delete session
async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    if state.sessions.remove(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::SessionNotFound(id))
    }
}

/// List sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.sessions.list();
    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

/// Chat request
#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
}

/// Chat response
#[derive(Debug, Serialize)]
struct ChatResponse {
    response: String,
    stage: String,
    forced_offer: bool,
    banner: Option<OfferBanner>,
    funnel: FunnelSnapshot,
    history: Vec<Turn>,
}

/// Chat endpoint
async fn chat(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ServerError> {
    let entry = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| ServerError::SessionNotFound(session_id.clone()))?;

    if request.message.trim().is_empty() {
        return Err(ServerError::InvalidRequest("message is blank".to_string()));
    }

    // Waits for any turn already in flight on this session
    let mut session = entry.lock().await;
    entry.touch();

    let start = Instant::now();
    match state.agent.respond(&mut session, &request.message).await {
        Ok(Some(reply)) => {
            metrics::record_generation_latency(start.elapsed());
            metrics::record_turn(reply.stage);
            if reply.forced_offer {
                metrics::record_forced_offer();
            }
            if reply.banner.is_some() {
                metrics::record_banner_shown();
            }

            Ok(Json(ChatResponse {
                response: reply.text,
                stage: reply.stage.to_string(),
                forced_offer: reply.forced_offer,
                banner: reply.banner,
                funnel: reply.funnel,
                history: session.history().to_vec(),
            }))
        }
        Ok(None) => Err(ServerError::InvalidRequest("message is blank".to_string())),
        Err(e) => {
            let kind = match &e {
                AgentError::Timeout(_) => "timeout",
                _ => "unavailable",
            };
            metrics::record_generation_failure(kind);
            tracing::error!(session_id = %session_id, error = %e, "Chat error");
            Err(ServerError::from(e))
        }
    }
}

/// Health check
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "model": state.agent.model_name(),
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.sessions.count(),
    }))
}
