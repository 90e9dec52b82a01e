//! Prompt Building
//!
//! Constructs the chat-completion message list for the sales persona:
//! system prompt, recent history, then the current (augmented) user input.

use vanguard_config::{OfferConfig, PersonaConfig};
use vanguard_core::{Message, Role, Turn};

/// Prompt builder for the sales agent
#[derive(Debug, Default)]
pub struct PromptBuilder {
    messages: Vec<Message>,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the system prompt from persona and offer terms
    pub fn system_prompt(mut self, persona: &PersonaConfig, offer: &OfferConfig) -> Self {
        self.messages
            .push(Message::system(render_system_prompt(persona, offer)));
        self
    }

    /// Add conversation history, oldest first
    pub fn with_history(mut self, history: &[Turn]) -> Self {
        self.messages.extend(history.iter().map(Message::from));
        self
    }

    /// Add current user message
    pub fn user_message(mut self, message: &str) -> Self {
        self.messages.push(Message::user(message));
        self
    }

    /// Build final message list
    pub fn build(self) -> Vec<Message> {
        self.messages
    }

    /// Get message count
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Rough token count (~4 chars per token)
    pub fn estimate_tokens(&self) -> usize {
        self.messages
            .iter()
            .map(|m| m.content.chars().count().div_ceil(4))
            .sum()
    }

    /// Whether a system prompt has been added
    pub fn has_system_prompt(&self) -> bool {
        self.messages.iter().any(|m| m.role == Role::System)
    }
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_system_prompt(persona: &PersonaConfig, offer: &OfferConfig) -> String {
    format!(
        r#"Você é um vendedor experiente especializado no {product}.

OBJETIVO PRINCIPAL:
{objective}

SEU PERFIL DE VENDEDOR:
{profile}

PROCESSO DE VENDAS:
{process}

GATILHOS PARA OFERTA:
{triggers}

USE ESTAS TÉCNICAS DE PERSUASÃO:
{techniques}

INFORMAÇÕES SOBRE O PRODUTO:
{knowledge}

REGRAS IMPORTANTES:
{rules}

Link do produto: {url}
Preço do Manual: {price} (use este valor em suas ofertas)"#,
        product = persona.product_name,
        objective = persona.objective,
        profile = bullets(&persona.profile),
        process = numbered(&persona.sales_process),
        triggers = bullets(&persona.offer_triggers),
        techniques = bullets(&persona.persuasion_techniques),
        knowledge = persona.knowledge_base,
        rules = bullets(&persona.rules),
        url = offer.url,
        price = offer.price,
    )
}
