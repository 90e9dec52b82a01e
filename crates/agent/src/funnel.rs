//! Funnel Tracker
//!
//! Converts two monotonic counters (interactions and detected interest) into a
//! symbolic funnel stage plus the commercial-nudge decisions: forcing the offer
//! into the reply and showing the offer banner.
//!
//! Stage is derived, never stored. Evaluation order, first match wins:
//! 1. first contact → `Rapport`
//! 2. enough interest, or enough interactions → `Close`
//! 3. early interactions → `Qualify`
//! 4. otherwise → `Neutral`
//!
//! Interest overrides the count-based qualification range, so a prospect who
//! shows interest twice in the first three turns is already in `Close`.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vanguard_config::{FunnelConfig, FunnelThresholds, StageContext};

use crate::keywords::KeywordSet;

/// Funnel stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    /// First contact: be welcoming, ask discovery questions
    Rapport,
    /// Probe for specific pain points
    Qualify,
    /// Present concrete benefits, make a direct offer
    Close,
    /// No extra annotation
    #[default]
    Neutral,
}

impl FunnelStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunnelStage::Rapport => "rapport",
            FunnelStage::Qualify => "qualify",
            FunnelStage::Close => "close",
            FunnelStage::Neutral => "neutral",
        }
    }

    /// Internal context sentence for this stage (empty for `Neutral`)
    pub fn annotation<'a>(&self, context: &'a StageContext) -> &'a str {
        match self {
            FunnelStage::Rapport => &context.rapport,
            FunnelStage::Qualify => &context.qualify,
            FunnelStage::Close => &context.close,
            FunnelStage::Neutral => "",
        }
    }
}

impl fmt::Display for FunnelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword sets and thresholds shared by every tracker of a deployment
#[derive(Debug, Clone)]
pub struct FunnelRules {
    pub interest: KeywordSet,
    pub purchase_intent: KeywordSet,
    pub thresholds: FunnelThresholds,
}

impl FunnelRules {
    pub fn from_config(config: &FunnelConfig) -> Self {
        Self {
            interest: KeywordSet::new("interest", &config.interest_keywords),
            purchase_intent: KeywordSet::new("purchase_intent", &config.purchase_keywords),
            thresholds: config.thresholds,
        }
    }
}

impl Default for FunnelRules {
    fn default() -> Self {
        Self::from_config(&FunnelConfig::default())
    }
}

/// Serializable view of the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelSnapshot {
    pub interaction_count: u32,
    pub interest_score: u32,
    pub stage: FunnelStage,
}

/// Per-session funnel state
///
/// Cheap to clone: the response generator stages a copy for the pending turn
/// and commits it only after generation succeeds.
#[derive(Debug, Clone)]
pub struct FunnelTracker {
    rules: Arc<FunnelRules>,
    interaction_count: u32,
    interest_score: u32,
}

impl FunnelTracker {
    /// Create a tracker with both counters at zero
    pub fn new(rules: Arc<FunnelRules>) -> Self {
        Self {
            rules,
            interaction_count: 0,
            interest_score: 0,
        }
    }

    /// Record one user turn. Returns whether it matched an interest keyword.
    ///
    /// Interest increments at most once per turn, so
    /// `interest_score <= interaction_count` always holds.
    pub fn record_turn(&mut self, text: &str) -> bool {
        self.interaction_count = self.interaction_count.saturating_add(1);

        let matched = self.rules.interest.matched(text);
        let interested = !matched.is_empty();
        if interested {
            self.interest_score = self.interest_score.saturating_add(1);
        }

        tracing::trace!(
            interaction_count = self.interaction_count,
            interest_score = self.interest_score,
            keywords = ?matched,
            "Funnel turn recorded"
        );

        interested
    }

    /// Current stage, derived from the counters
    pub fn current_stage(&self) -> FunnelStage {
        let t = &self.rules.thresholds;
        let count = self.interaction_count;
        let interest = self.interest_score;

        if count == 0 {
            return FunnelStage::Neutral;
        }
        if count <= t.rapport_max_interactions {
            return FunnelStage::Rapport;
        }
        if interest >= t.close_min_interest || count >= t.close_min_interactions {
            return FunnelStage::Close;
        }
        if count <= t.qualify_max_interactions {
            return FunnelStage::Qualify;
        }
        FunnelStage::Neutral
    }

    /// Whether the reply must carry the price and purchase link
    pub fn should_force_offer(&self) -> bool {
        let t = &self.rules.thresholds;
        self.interest_score >= t.offer_min_interest
            && self.interaction_count >= t.offer_min_interactions
    }

    /// Whether the offer banner should be shown after a turn with `text`
    pub fn should_show_offer_banner(&self, text: &str) -> bool {
        let t = &self.rules.thresholds;
        self.rules.purchase_intent.matches(text)
            || self.interest_score >= t.banner_min_interest
            || self.interaction_count >= t.banner_min_interactions
    }

    pub fn interaction_count(&self) -> u32 {
        self.interaction_count
    }

    pub fn interest_score(&self) -> u32 {
        self.interest_score
    }

    pub fn rules(&self) -> &FunnelRules {
        &self.rules
    }

    pub fn snapshot(&self) -> FunnelSnapshot {
        FunnelSnapshot {
            interaction_count: self.interaction_count,
            interest_score: self.interest_score,
            stage: self.current_stage(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_counters(interaction_count: u32, interest_score: u32) -> Self {
        Self {
            rules: Arc::new(FunnelRules::default()),
            interaction_count,
            interest_score,
        }
    }
}

impl Default for FunnelTracker {
    fn default() -> Self {
        Self::new(Arc::new(FunnelRules::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(count: u32, interest: u32) -> FunnelStage {
        FunnelTracker::with_counters(count, interest).current_stage()
    }

    #[test]
    fn test_record_turn_counts() {
        let mut tracker = FunnelTracker::default();
        assert!(!tracker.record_turn("Oi"));
        assert!(tracker.record_turn("tenho dificuldade com produtividade"));
        // Several keywords in one turn still count once
        assert!(tracker.record_turn("quero saber o preço e o valor"));

        assert_eq!(tracker.interaction_count(), 3);
        assert_eq!(tracker.interest_score(), 2);
    }

    #[test]
    fn test_stage_table() {
        assert_eq!(stage(0, 0), FunnelStage::Neutral);
        assert_eq!(stage(1, 0), FunnelStage::Rapport);
        assert_eq!(stage(1, 1), FunnelStage::Rapport);
        assert_eq!(stage(2, 0), FunnelStage::Qualify);
        assert_eq!(stage(2, 1), FunnelStage::Qualify);
        assert_eq!(stage(3, 1), FunnelStage::Qualify);
        assert_eq!(stage(4, 0), FunnelStage::Close);
        assert_eq!(stage(9, 0), FunnelStage::Close);
    }

    #[test]
    fn test_interest_overrides_qualify_range() {
        assert_eq!(stage(2, 2), FunnelStage::Close);
        assert_eq!(stage(3, 2), FunnelStage::Close);
    }

    #[test]
    fn test_no_regression_after_close_min_interactions() {
        let mut tracker = FunnelTracker::default();
        for _ in 0..4 {
            tracker.record_turn("ok");
        }
        for _ in 0..10 {
            assert_eq!(tracker.current_stage(), FunnelStage::Close);
            tracker.record_turn("ok");
        }
    }

    #[test]
    fn test_force_offer() {
        assert!(!FunnelTracker::with_counters(2, 5).should_force_offer());
        assert!(FunnelTracker::with_counters(3, 2).should_force_offer());
        assert!(!FunnelTracker::with_counters(3, 1).should_force_offer());
        assert!(FunnelTracker::with_counters(10, 2).should_force_offer());
    }

    #[test]
    fn test_banner_triggers() {
        // Purchase intent alone
        assert!(FunnelTracker::with_counters(1, 0).should_show_offer_banner("quero comprar agora"));
        // Interest threshold
        assert!(FunnelTracker::with_counters(3, 3).should_show_offer_banner("ok"));
        // Interaction threshold
        assert!(FunnelTracker::with_counters(5, 0).should_show_offer_banner("ok"));
        assert!(!FunnelTracker::with_counters(4, 2).should_show_offer_banner("ok"));
    }

    #[test]
    fn test_custom_thresholds() {
        let config = FunnelConfig {
            thresholds: FunnelThresholds {
                offer_min_interest: 1,
                offer_min_interactions: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut tracker = FunnelTracker::new(Arc::new(FunnelRules::from_config(&config)));
        tracker.record_turn("qual o preço?");
        assert!(tracker.should_force_offer());
        // Banner thresholds are independent of the offer thresholds
        assert!(!tracker.should_show_offer_banner("ok"));
    }

    #[test]
    fn test_annotation() {
        let context = StageContext::default();
        assert!(FunnelStage::Rapport
            .annotation(&context)
            .starts_with("Este é o primeiro contato"));
        assert!(FunnelStage::Qualify
            .annotation(&context)
            .starts_with("Fase de qualificação"));
        assert!(FunnelStage::Close
            .annotation(&context)
            .starts_with("Cliente demonstra interesse"));
        assert_eq!(FunnelStage::Neutral.annotation(&context), "");
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = FunnelTracker::with_counters(3, 2).snapshot();
        let json = serde_json::to_value(snapshot).unwrap();
        assert_eq!(json["interaction_count"], 3);
        assert_eq!(json["interest_score"], 2);
        assert_eq!(json["stage"], "close");
        assert_eq!(FunnelStage::Qualify.to_string(), "qualify");
    }
}
