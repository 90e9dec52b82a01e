//! HTTP API against a scripted language model

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use vanguard_agent::{SalesAgent, SalesAgentConfig};
use vanguard_config::Settings;
use vanguard_core::{Error, GenerateRequest, GenerateResponse, LanguageModel, Result};
use vanguard_server::{create_router, AppState};

const URL: &str = "https://pay.example.com/manual";

/// Fixed reply; "falha" in the input fails the call and "demora" stalls it
struct StubModel {
    delay: Duration,
}

#[async_trait]
impl LanguageModel for StubModel {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        tokio::time::sleep(self.delay).await;
        let input = request.last_user_message().unwrap_or_default().to_string();
        if input.contains("falha") {
            return Err(Error::GenerationUnavailable("HTTP 503".to_string()));
        }
        if input.contains("demora") {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        Ok(GenerateResponse::text("Entendo, me conte mais."))
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}

fn app_with_delay(delay: Duration) -> Router {
    let mut settings = Settings::default();
    settings.offer.price = "R$19,90".to_string();
    settings.offer.url = URL.to_string();

    let mut config = SalesAgentConfig::from_settings(&settings);
    config.generation_timeout = Duration::from_millis(500);
    let agent = SalesAgent::new(Arc::new(StubModel { delay }), config);

    create_router(AppState::new(settings, agent))
}

fn app_with_idle_timeout(seconds: u64) -> Router {
    let mut settings = Settings::default();
    settings.offer.price = "R$19,90".to_string();
    settings.offer.url = URL.to_string();
    settings.server.session_timeout_seconds = seconds;

    let config = SalesAgentConfig::from_settings(&settings);
    let agent = SalesAgent::new(Arc::new(StubModel { delay: Duration::ZERO }), config);

    create_router(AppState::new(settings, agent))
}

fn app() -> Router {
    app_with_delay(Duration::ZERO)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create_session(app: &Router) -> String {
    let (status, body) = send(app, "POST", "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"].as_str().unwrap().to_string()
}

async fn chat(app: &Router, id: &str, message: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        &format!("/api/chat/{id}"),
        Some(json!({ "message": message })),
    )
    .await
}

#[tokio::test]
async fn test_create_session_has_greeting() {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/sessions", None).await;

    assert_eq!(status, StatusCode::CREATED);
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["role"], "agent");
    assert!(history[0]["content"]
        .as_str()
        .unwrap()
        .starts_with("Olá! Que bom te ver por aqui!"));
    assert_eq!(body["interaction_count"], 0);
    assert_eq!(body["stage"], "neutral");
}

#[tokio::test]
async fn test_chat_flow() {
    let app = app();
    let id = create_session(&app).await;

    let (status, body) = chat(&app, &id, "Oi").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Entendo, me conte mais.");
    assert_eq!(body["stage"], "rapport");
    assert_eq!(body["forced_offer"], false);
    assert!(body["banner"].is_null());
    assert_eq!(body["funnel"]["interaction_count"], 1);
    assert_eq!(body["history"].as_array().unwrap().len(), 3);

    chat(&app, &id, "tenho dificuldade com produtividade").await;
    let (status, body) = chat(&app, &id, "quero saber o preço").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "close");
    assert_eq!(body["forced_offer"], true);
    assert!(body["response"].as_str().unwrap().contains(URL));
    assert_eq!(body["banner"]["action_url"], URL);

    let (status, body) = send(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["interaction_count"], 3);
    assert_eq!(body["interest_score"], 2);
    assert_eq!(body["history"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_blank_message_rejected() {
    let app = app();
    let id = create_session(&app).await;

    let (status, body) = chat(&app, &id, "   ").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["retryable"], false);

    let (_, body) = send(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(body["interaction_count"], 0);
}

#[tokio::test]
async fn test_unknown_session() {
    let app = app();
    let (status, _) = chat(&app, "missing", "Oi").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/sessions/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generation_failure_keeps_session_usable() {
    let app = app();
    let id = create_session(&app).await;

    chat(&app, &id, "Oi").await;
    let (status, body) = chat(&app, &id, "falha").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["retryable"], true);

    let (_, body) = send(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(body["interaction_count"], 1);
    assert_eq!(body["history"].as_array().unwrap().len(), 3);

    let (status, body) = chat(&app, &id, "ok").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["funnel"]["interaction_count"], 2);
}

#[tokio::test]
async fn test_generation_timeout() {
    let app = app();
    let id = create_session(&app).await;

    let (status, _) = chat(&app, &id, "demora").await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);

    let (_, body) = send(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(body["interaction_count"], 0);
}

#[tokio::test]
async fn test_concurrent_turns_are_serialized() {
    let app = app_with_delay(Duration::from_millis(20));
    let id = create_session(&app).await;

    let turns = (0..4).map(|i| {
        let app = app.clone();
        let id = id.clone();
        async move { chat(&app, &id, &format!("mensagem {i}")).await }
    });
    let results = futures::future::join_all(turns).await;
    assert!(results.iter().all(|(status, _)| *status == StatusCode::OK));

    let mut counts: Vec<u64> = results
        .iter()
        .map(|(_, body)| body["funnel"]["interaction_count"].as_u64().unwrap())
        .collect();
    counts.sort_unstable();
    assert_eq!(counts, vec![1, 2, 3, 4]);

    let (_, body) = send(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 9);
    // Turns alternate user/agent without interleaving
    for (i, turn) in history.iter().enumerate().skip(1) {
        let expected = if i % 2 == 1 { "user" } else { "agent" };
        assert_eq!(turn["role"], expected);
        assert_eq!(turn["index"], i);
    }
}

#[tokio::test]
async fn test_delete_session() {
    let app = app();
    let id = create_session(&app).await;

    let (status, _) = send(&app, "DELETE", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = chat(&app, &id, "Oi").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["retryable"], false);
}

#[tokio::test(start_paused = true)]
async fn test_polling_keeps_session_alive() {
    let app = app_with_idle_timeout(60);
    let id = create_session(&app).await;
    let uri = format!("/api/sessions/{id}");

    tokio::time::advance(Duration::from_secs(45)).await;
    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    // 75s since creation, 30s since the last poll
    tokio::time::advance(Duration::from_secs(30)).await;
    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::advance(Duration::from_secs(61)).await;
    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "stub-model");
}

#[tokio::test]
async fn test_metrics_disabled_without_recorder() {
    let app = app();
    let (status, _) = send(&app, "GET", "/metrics", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
