//! End-to-end funnel scenarios against a scripted language model

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use vanguard_agent::{AgentError, FunnelStage, SalesAgent, SalesAgentConfig};
use vanguard_config::Settings;
use vanguard_core::{
    Error, GenerateRequest, GenerateResponse, LanguageModel, Result, Role,
};

const URL: &str = "https://pay.example.com/manual";

enum Step {
    Reply(&'static str),
    Fail,
    Hang,
}

/// Plays back scripted steps and records every request it receives
struct ScriptedModel {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedModel {
    fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        self.requests.lock().push(request);
        let step = self.steps.lock().pop_front();
        match step {
            Some(Step::Reply(text)) => Ok(GenerateResponse::text(text)),
            Some(Step::Fail) => Err(Error::GenerationUnavailable("HTTP 503".to_string())),
            Some(Step::Hang) => {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(GenerateResponse::text("too late"))
            }
            None => Ok(GenerateResponse::text("Certo!")),
        }
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.offer.price = "R$19,90".to_string();
    settings.offer.url = URL.to_string();
    settings
}

fn agent_with(model: Arc<ScriptedModel>, config: SalesAgentConfig) -> SalesAgent {
    SalesAgent::new(model, config)
}

fn agent(model: Arc<ScriptedModel>) -> SalesAgent {
    agent_with(model, SalesAgentConfig::from_settings(&settings()))
}

#[tokio::test]
async fn test_three_turn_funnel() {
    let model = ScriptedModel::new(vec![
        Step::Reply("Olá! Prazer em te conhecer."),
        Step::Reply("Entendo, produtividade é um desafio comum."),
        Step::Reply("O Manual resolve exatamente isso."),
    ]);
    let agent = agent(model.clone());
    let mut session = agent.new_session();

    // Turn 1: rapport, nothing commercial
    let reply = agent.respond(&mut session, "Oi").await.unwrap().unwrap();
    assert_eq!(reply.stage, FunnelStage::Rapport);
    assert_eq!(reply.funnel.interest_score, 0);
    assert!(!reply.forced_offer);
    assert!(reply.banner.is_none());

    // Turn 2: interest detected, still qualifying
    let reply = agent
        .respond(&mut session, "tenho dificuldade com produtividade")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reply.stage, FunnelStage::Qualify);
    assert_eq!(reply.funnel.interest_score, 1);
    assert!(!reply.forced_offer);

    // Turn 3: second interest hit forces the offer even though the model omitted it
    let reply = agent
        .respond(&mut session, "quero saber o preço")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reply.funnel.interaction_count, 3);
    assert_eq!(reply.funnel.interest_score, 2);
    assert_eq!(reply.stage, FunnelStage::Close);
    assert!(reply.forced_offer);
    assert!(reply.text.starts_with("O Manual resolve exatamente isso.\n\n"));
    assert!(reply.text.contains("R$19,90"));
    assert!(reply.text.contains(URL));
    // "quero" and "preço" are purchase-intent keywords
    assert!(reply.banner.is_some());

    // The stored reply is the final displayed text
    assert_eq!(session.history().last().unwrap().content(), reply.text);
    assert_eq!(session.history().len(), 7);
}

#[tokio::test]
async fn test_model_input_shape() {
    let model = ScriptedModel::new(vec![Step::Reply("Olá!"), Step::Reply("Entendo.")]);
    let agent = agent(model.clone());
    let mut session = agent.new_session();

    agent.respond(&mut session, "Oi").await.unwrap();
    agent.respond(&mut session, "sou designer").await.unwrap();

    let requests = model.requests();
    assert_eq!(requests.len(), 2);

    let first = &requests[0];
    assert_eq!(first.messages[0].role, Role::System);
    assert_eq!(first.messages[1].role, Role::Assistant);
    assert!(first.messages[1].content.starts_with("Olá! Que bom te ver por aqui!"));
    assert_eq!(
        first.messages.last().unwrap().content,
        "Oi [CONTEXTO INTERNO: Este é o primeiro contato. Seja acolhedor e faça perguntas para conhecer o cliente.]"
    );

    // History sent to the model holds plain user text, never the annotation
    let second = &requests[1];
    assert_eq!(second.messages[2].content, "Oi");
    assert_eq!(second.messages[3].content, "Olá!");
    assert!(second
        .messages
        .last()
        .unwrap()
        .content
        .starts_with("sou designer [CONTEXTO INTERNO: Fase de qualificação."));
    assert_eq!(second.temperature, Some(0.7));
}

#[tokio::test]
async fn test_history_window_is_bounded() {
    let model = ScriptedModel::new(vec![]);
    let agent = agent(model.clone());
    let mut session = agent.new_session();

    for i in 0..6 {
        agent
            .respond(&mut session, &format!("mensagem {i}"))
            .await
            .unwrap();
    }

    let last = model.requests().pop().unwrap();
    // system + 5 window turns + current input
    assert_eq!(last.messages.len(), 7);
    assert_eq!(session.history().len(), 13);
}

#[tokio::test]
async fn test_interaction_count_matches_turns() {
    let model = ScriptedModel::new(vec![]);
    let agent = agent(model);
    let mut session = agent.new_session();

    let inputs = [
        "Oi",
        "como funciona?",
        "ok",
        "tenho um problema",
        "preciso de ajuda",
        "sim",
        "talvez",
    ];
    for (n, input) in inputs.iter().enumerate() {
        let reply = agent.respond(&mut session, input).await.unwrap().unwrap();
        assert_eq!(reply.funnel.interaction_count as usize, n + 1);
        assert!(reply.funnel.interest_score <= reply.funnel.interaction_count);
        if n + 1 >= 4 {
            assert_eq!(reply.stage, FunnelStage::Close);
        }
    }
}

#[tokio::test]
async fn test_purchase_intent_shows_banner_on_first_turn() {
    let model = ScriptedModel::new(vec![Step::Reply("Que ótimo!")]);
    let agent = agent(model);
    let mut session = agent.new_session();

    let reply = agent
        .respond(&mut session, "quero comprar agora")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reply.stage, FunnelStage::Rapport);
    assert!(!reply.forced_offer);

    let banner = reply.banner.expect("banner");
    assert_eq!(banner.title, "Manual de Alta Performance com IA");
    assert_eq!(banner.action_url, URL);
}

#[tokio::test]
async fn test_forced_offer_is_not_duplicated() {
    let model = ScriptedModel::new(vec![
        Step::Reply("Olá!"),
        Step::Reply("Entendo."),
        Step::Reply("Garanta agora: https://pay.example.com/manual"),
    ]);
    let agent = agent(model);
    let mut session = agent.new_session();

    agent.respond(&mut session, "preciso de ajuda").await.unwrap();
    agent.respond(&mut session, "qual o valor?").await.unwrap();
    let reply = agent
        .respond(&mut session, "ok")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(reply.funnel.interest_score, 2);
    assert!(!reply.forced_offer);
    assert_eq!(reply.text, "Garanta agora: https://pay.example.com/manual");
    assert_eq!(reply.text.matches(URL).count(), 1);
}

#[tokio::test]
async fn test_failed_turn_is_not_counted() {
    let model = ScriptedModel::new(vec![
        Step::Reply("Olá!"),
        Step::Fail,
        Step::Reply("Entendo."),
    ]);
    let agent = agent(model);
    let mut session = agent.new_session();

    agent.respond(&mut session, "Oi").await.unwrap();
    assert_eq!(session.interaction_count(), 1);
    let history_len = session.history().len();

    let err = agent
        .respond(&mut session, "tenho dificuldade")
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::GenerationUnavailable(_)));
    assert!(err.is_retryable());
    assert_eq!(session.interaction_count(), 1);
    assert_eq!(session.interest_score(), 0);
    assert_eq!(session.history().len(), history_len);

    // Retrying the same input counts it exactly once
    let reply = agent
        .respond(&mut session, "tenho dificuldade")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reply.funnel.interaction_count, 2);
    assert_eq!(reply.funnel.interest_score, 1);
    assert_eq!(session.history().len(), history_len + 2);
}

#[tokio::test]
async fn test_timeout_leaves_session_untouched() {
    let model = ScriptedModel::new(vec![Step::Hang, Step::Reply("Olá!")]);
    let mut config = SalesAgentConfig::from_settings(&settings());
    config.generation_timeout = Duration::from_millis(50);
    let agent = agent_with(model, config);
    let mut session = agent.new_session();

    let err = agent.respond(&mut session, "Oi").await.unwrap_err();
    assert_eq!(err, AgentError::Timeout(50));
    assert_eq!(session.interaction_count(), 0);
    assert_eq!(session.history().len(), 1);

    let reply = agent.respond(&mut session, "Oi").await.unwrap().unwrap();
    assert_eq!(reply.stage, FunnelStage::Rapport);
    assert_eq!(session.interaction_count(), 1);
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let model = ScriptedModel::new(vec![]);
    let agent = agent(model);
    let mut first = agent.new_session();
    let mut second = agent.new_session();

    agent.respond(&mut first, "qual o preço?").await.unwrap();
    agent.respond(&mut first, "interessante").await.unwrap();

    assert_ne!(first.id(), second.id());
    assert_eq!(first.interest_score(), 2);
    assert_eq!(second.interaction_count(), 0);

    let reply = agent.respond(&mut second, "Oi").await.unwrap().unwrap();
    assert_eq!(reply.stage, FunnelStage::Rapport);
}
