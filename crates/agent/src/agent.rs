//! Sales agent
//!
//! Produces the agent's reply for one user turn:
//! 1. stage a copy of the funnel tracker and record the turn on it
//! 2. annotate the user input with the stage's internal context
//! 3. generate with the persona system prompt and the recent history window
//! 4. force the call-to-action when the funnel says so
//! 5. commit tracker and history, then decide on the offer banner
//!
//! A failed or timed-out generation leaves the session untouched, so the same
//! input can be retried and is counted exactly once.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use vanguard_config::{FunnelConfig, OfferConfig, PersonaConfig, Settings};
use vanguard_core::{GenerateRequest, LanguageModel};
use vanguard_llm::PromptBuilder;

use crate::funnel::{FunnelRules, FunnelSnapshot, FunnelStage, FunnelTracker};
use crate::offer::{OfferBanner, OfferPolicy};
use crate::session::Session;
use crate::AgentError;

/// Sales agent configuration
#[derive(Debug, Clone)]
pub struct SalesAgentConfig {
    pub persona: PersonaConfig,
    pub offer: OfferConfig,
    pub funnel: FunnelConfig,
    /// Sampling temperature, fixed by configuration
    pub temperature: f32,
    pub max_tokens: Option<usize>,
    /// Upper bound for one generation call
    pub generation_timeout: Duration,
}

impl SalesAgentConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            persona: settings.persona.clone(),
            offer: settings.offer.clone(),
            funnel: settings.funnel.clone(),
            temperature: settings.llm.temperature,
            max_tokens: settings.llm.max_tokens,
            generation_timeout: Duration::from_secs(settings.llm.timeout_seconds),
        }
    }
}

/// Reply for one user turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentReply {
    /// Text shown to the user (call-to-action included when forced)
    pub text: String,
    /// Stage the turn was generated in
    pub stage: FunnelStage,
    /// Whether the closing sentence was appended
    pub forced_offer: bool,
    /// Banner to render, when triggered
    pub banner: Option<OfferBanner>,
    /// Counters after the turn
    pub funnel: FunnelSnapshot,
}

/// Response generator driving the sales funnel
pub struct SalesAgent {
    llm: Arc<dyn LanguageModel>,
    config: SalesAgentConfig,
    rules: Arc<FunnelRules>,
    offer: OfferPolicy,
    banner: OfferBanner,
}

impl SalesAgent {
    pub fn new(llm: Arc<dyn LanguageModel>, config: SalesAgentConfig) -> Self {
        let rules = Arc::new(FunnelRules::from_config(&config.funnel));
        let offer = OfferPolicy::from_config(&config.offer);
        let banner = OfferBanner::from_config(&config.offer);

        Self {
            llm,
            config,
            rules,
            offer,
            banner,
        }
    }

    pub fn from_settings(llm: Arc<dyn LanguageModel>, settings: &Settings) -> Self {
        Self::new(llm, SalesAgentConfig::from_settings(settings))
    }

    pub fn config(&self) -> &SalesAgentConfig {
        &self.config
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    pub fn language_model(&self) -> &Arc<dyn LanguageModel> {
        &self.llm
    }

    /// Start a new conversation, seeded with the greeting
    pub fn new_session(&self) -> Session {
        Session::new(
            self.config.persona.greeting.clone(),
            self.config.funnel.history_window_turns,
            FunnelTracker::new(self.rules.clone()),
        )
    }

    /// User text plus the internal stage annotation
    pub fn augment_input(&self, text: &str, stage: FunnelStage) -> String {
        format!(
            "{} [{}: {}]",
            text,
            self.config.funnel.context_marker,
            stage.annotation(&self.config.funnel.stage_context)
        )
    }

    /// System prompt, history window, then the augmented input
    pub fn build_request(&self, session: &Session, augmented_input: &str) -> GenerateRequest {
        let messages = PromptBuilder::new()
            .system_prompt(&self.config.persona, &self.config.offer)
            .with_history(session.history_window())
            .user_message(augmented_input)
            .build();

        let mut request =
            GenerateRequest::from_messages(messages).with_temperature(self.config.temperature);
        if let Some(max_tokens) = self.config.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        request
    }

    /// Reply to one user turn.
    ///
    /// Blank input returns `Ok(None)` and changes nothing.
    pub async fn respond(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<Option<AgentReply>, AgentError> {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!(session_id = %session.id(), "Ignoring blank input");
            return Ok(None);
        }

        let mut staged = session.tracker().clone();
        let interested = staged.record_turn(text);
        let stage = staged.current_stage();

        let augmented = self.augment_input(text, stage);
        let request = self.build_request(session, &augmented);

        tracing::debug!(
            session_id = %session.id(),
            stage = %stage,
            interaction_count = staged.interaction_count(),
            interest_score = staged.interest_score(),
            interested,
            messages = request.messages.len(),
            "Generating reply"
        );

        let start = Instant::now();
        let response = match tokio::time::timeout(
            self.config.generation_timeout,
            self.llm.generate(request),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::warn!(session_id = %session.id(), error = %e, "Generation failed");
                return Err(AgentError::from(e));
            }
            Err(_) => {
                let ms = self.config.generation_timeout.as_millis() as u64;
                tracing::warn!(session_id = %session.id(), timeout_ms = ms, "Generation timed out");
                return Err(AgentError::Timeout(ms));
            }
        };

        if response.text.trim().is_empty() {
            tracing::warn!(session_id = %session.id(), "Empty completion");
            return Err(AgentError::GenerationUnavailable(
                "Empty completion".to_string(),
            ));
        }

        let (reply_text, forced_offer) = if staged.should_force_offer() {
            self.offer.ensure_call_to_action(&response.text)
        } else {
            (response.text, false)
        };

        session.commit_tracker(staged);
        session.record_exchange(text, reply_text.clone());

        let banner = session
            .tracker()
            .should_show_offer_banner(text)
            .then(|| self.banner.clone());

        tracing::info!(
            session_id = %session.id(),
            stage = %stage,
            interaction_count = session.interaction_count(),
            interest_score = session.interest_score(),
            forced_offer,
            banner = banner.is_some(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Turn completed"
        );

        Ok(Some(AgentReply {
            text: reply_text,
            stage,
            forced_offer,
            banner,
            funnel: session.snapshot(),
        }))
    }
}
