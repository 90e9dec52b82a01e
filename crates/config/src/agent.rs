//! Agent-facing configuration
//!
//! Persona, funnel heuristics and offer terms. Everything here is data: keyword
//! sets, thresholds and copy can be tuned per deployment without code changes.

use serde::{Deserialize, Serialize};

use crate::constants::{funnel, keywords, offer, persona, stage_context};

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Persona and product knowledge used to build the system prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// Agent name used in the greeting
    #[serde(default = "default_persona_name")]
    pub name: String,

    /// Product the agent sells
    #[serde(default = "default_product_name")]
    pub product_name: String,

    /// First agent turn of every session
    #[serde(default = "default_greeting")]
    pub greeting: String,

    #[serde(default = "default_objective")]
    pub objective: String,

    #[serde(default = "default_profile")]
    pub profile: Vec<String>,

    /// Ordered steps of the sales process
    #[serde(default = "default_sales_process")]
    pub sales_process: Vec<String>,

    #[serde(default = "default_offer_triggers")]
    pub offer_triggers: Vec<String>,

    #[serde(default = "default_persuasion_techniques")]
    pub persuasion_techniques: Vec<String>,

    #[serde(default = "default_rules")]
    pub rules: Vec<String>,

    /// Product summary the agent may draw on
    #[serde(default = "default_knowledge_base")]
    pub knowledge_base: String,
}

fn default_persona_name() -> String {
    persona::NAME.to_string()
}
fn default_product_name() -> String {
    persona::PRODUCT_NAME.to_string()
}
fn default_greeting() -> String {
    persona::GREETING.to_string()
}
fn default_objective() -> String {
    persona::OBJECTIVE.to_string()
}
fn default_profile() -> Vec<String> {
    to_strings(persona::PROFILE)
}
fn default_sales_process() -> Vec<String> {
    to_strings(persona::SALES_PROCESS)
}
fn default_offer_triggers() -> Vec<String> {
    to_strings(persona::OFFER_TRIGGERS)
}
fn default_persuasion_techniques() -> Vec<String> {
    to_strings(persona::PERSUASION_TECHNIQUES)
}
fn default_rules() -> Vec<String> {
    to_strings(persona::RULES)
}
fn default_knowledge_base() -> String {
    persona::KNOWLEDGE_BASE.to_string()
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: default_persona_name(),
            product_name: default_product_name(),
            greeting: default_greeting(),
            objective: default_objective(),
            profile: default_profile(),
            sales_process: default_sales_process(),
            offer_triggers: default_offer_triggers(),
            persuasion_techniques: default_persuasion_techniques(),
            rules: default_rules(),
            knowledge_base: default_knowledge_base(),
        }
    }
}

/// Counter thresholds for stage selection, forced offer and banner
///
/// Forced-offer and banner thresholds are separate on purpose and tuned
/// independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelThresholds {
    /// Interactions considered first contact
    #[serde(default = "default_rapport_max")]
    pub rapport_max_interactions: u32,

    /// Last interaction of the count-based qualification range
    #[serde(default = "default_qualify_max")]
    pub qualify_max_interactions: u32,

    #[serde(default = "default_close_min_interest")]
    pub close_min_interest: u32,

    #[serde(default = "default_close_min_interactions")]
    pub close_min_interactions: u32,

    #[serde(default = "default_offer_min_interest")]
    pub offer_min_interest: u32,

    #[serde(default = "default_offer_min_interactions")]
    pub offer_min_interactions: u32,

    #[serde(default = "default_banner_min_interest")]
    pub banner_min_interest: u32,

    #[serde(default = "default_banner_min_interactions")]
    pub banner_min_interactions: u32,
}

fn default_rapport_max() -> u32 {
    funnel::RAPPORT_MAX_INTERACTIONS
}
fn default_qualify_max() -> u32 {
    funnel::QUALIFY_MAX_INTERACTIONS
}
fn default_close_min_interest() -> u32 {
    funnel::CLOSE_MIN_INTEREST
}
fn default_close_min_interactions() -> u32 {
    funnel::CLOSE_MIN_INTERACTIONS
}
fn default_offer_min_interest() -> u32 {
    funnel::OFFER_MIN_INTEREST
}
fn default_offer_min_interactions() -> u32 {
    funnel::OFFER_MIN_INTERACTIONS
}
fn default_banner_min_interest() -> u32 {
    funnel::BANNER_MIN_INTEREST
}
fn default_banner_min_interactions() -> u32 {
    funnel::BANNER_MIN_INTERACTIONS
}

impl Default for FunnelThresholds {
    fn default() -> Self {
        Self {
            rapport_max_interactions: default_rapport_max(),
            qualify_max_interactions: default_qualify_max(),
            close_min_interest: default_close_min_interest(),
            close_min_interactions: default_close_min_interactions(),
            offer_min_interest: default_offer_min_interest(),
            offer_min_interactions: default_offer_min_interactions(),
            banner_min_interest: default_banner_min_interest(),
            banner_min_interactions: default_banner_min_interactions(),
        }
    }
}

/// Internal context sentence per funnel stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageContext {
    #[serde(default = "default_rapport_context")]
    pub rapport: String,
    #[serde(default = "default_qualify_context")]
    pub qualify: String,
    #[serde(default = "default_close_context")]
    pub close: String,
}

fn default_rapport_context() -> String {
    stage_context::RAPPORT.to_string()
}
fn default_qualify_context() -> String {
    stage_context::QUALIFY.to_string()
}
fn default_close_context() -> String {
    stage_context::CLOSE.to_string()
}

impl Default for StageContext {
    fn default() -> Self {
        Self {
            rapport: default_rapport_context(),
            qualify: default_qualify_context(),
            close: default_close_context(),
        }
    }
}

/// Funnel tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelConfig {
    /// Number of most recent turns passed to the model
    #[serde(default = "default_history_window")]
    pub history_window_turns: usize,

    /// Label of the internal annotation appended to user input
    #[serde(default = "default_context_marker")]
    pub context_marker: String,

    #[serde(default = "default_interest_keywords")]
    pub interest_keywords: Vec<String>,

    #[serde(default = "default_purchase_keywords")]
    pub purchase_keywords: Vec<String>,

    #[serde(default)]
    pub thresholds: FunnelThresholds,

    #[serde(default)]
    pub stage_context: StageContext,
}

fn default_history_window() -> usize {
    funnel::HISTORY_WINDOW_TURNS
}
fn default_context_marker() -> String {
    funnel::CONTEXT_MARKER.to_string()
}
fn default_interest_keywords() -> Vec<String> {
    to_strings(keywords::INTEREST)
}
fn default_purchase_keywords() -> Vec<String> {
    to_strings(keywords::PURCHASE_INTENT)
}

impl Default for FunnelConfig {
    fn default() -> Self {
        Self {
            history_window_turns: default_history_window(),
            context_marker: default_context_marker(),
            interest_keywords: default_interest_keywords(),
            purchase_keywords: default_purchase_keywords(),
            thresholds: FunnelThresholds::default(),
            stage_context: StageContext::default(),
        }
    }
}

/// Offer banner copy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerConfig {
    #[serde(default = "default_banner_title")]
    pub title: String,

    #[serde(default = "default_banner_description")]
    pub description: String,

    /// Price as displayed on the banner; falls back to `offer.price` when empty
    #[serde(default)]
    pub display_price: String,

    #[serde(default = "default_banner_highlights")]
    pub highlights: Vec<String>,

    #[serde(default = "default_banner_action_label")]
    pub action_label: String,
}

fn default_banner_title() -> String {
    offer::BANNER_TITLE.to_string()
}
fn default_banner_description() -> String {
    offer::BANNER_DESCRIPTION.to_string()
}
fn default_banner_highlights() -> Vec<String> {
    to_strings(offer::BANNER_HIGHLIGHTS)
}
fn default_banner_action_label() -> String {
    offer::BANNER_ACTION_LABEL.to_string()
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            title: default_banner_title(),
            description: default_banner_description(),
            display_price: String::new(),
            highlights: default_banner_highlights(),
            action_label: default_banner_action_label(),
        }
    }
}

/// Commercial terms of the offer
///
/// `price` and `url` are deliberately empty by default and must come from
/// configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferConfig {
    /// Price string as quoted to the prospect (e.g. "R$19,90")
    #[serde(default)]
    pub price: String,

    /// Canonical purchase URL
    #[serde(default)]
    pub url: String,

    /// Closing sentence with `{price}` and `{url}` placeholders
    #[serde(default = "default_closing_template")]
    pub closing_template: String,

    #[serde(default)]
    pub banner: BannerConfig,
}

fn default_closing_template() -> String {
    offer::CLOSING_TEMPLATE.to_string()
}

impl Default for OfferConfig {
    fn default() -> Self {
        Self {
            price: String::new(),
            url: String::new(),
            closing_template: default_closing_template(),
            banner: BannerConfig::default(),
        }
    }
}

impl OfferConfig {
    /// Price shown on the banner
    pub fn banner_price(&self) -> &str {
        if self.banner.display_price.trim().is_empty() {
            &self.price
        } else {
            &self.banner.display_price
        }
    }
}
