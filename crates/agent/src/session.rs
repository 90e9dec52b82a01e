//! Conversation session
//!
//! One session per conversation: the full turn history, a bounded window over
//! it for the model, and the funnel tracker. Sessions live in memory only.

use chrono::{DateTime, Utc};
use vanguard_core::Turn;

use crate::funnel::{FunnelSnapshot, FunnelStage, FunnelTracker};

/// Per-conversation state
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    created_at: DateTime<Utc>,
    history: Vec<Turn>,
    window_turns: usize,
    tracker: FunnelTracker,
}

impl Session {
    /// Create a session seeded with the agent greeting
    ///
    /// `window_turns` is clamped to at least one turn.
    pub fn new(greeting: impl Into<String>, window_turns: usize, tracker: FunnelTracker) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            history: vec![Turn::agent(greeting, 0)],
            window_turns: window_turns.max(1),
            tracker,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Full history, oldest first
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// The most recent `window_turns` turns, oldest first
    pub fn history_window(&self) -> &[Turn] {
        let start = self.history.len().saturating_sub(self.window_turns);
        &self.history[start..]
    }

    pub fn window_turns(&self) -> usize {
        self.window_turns
    }

    /// Append a user turn followed by the agent reply
    pub fn record_exchange(&mut self, user_text: impl Into<String>, agent_text: impl Into<String>) {
        let next = self.history.len();
        self.history.push(Turn::user(user_text, next));
        self.history.push(Turn::agent(agent_text, next + 1));
    }

    pub fn tracker(&self) -> &FunnelTracker {
        &self.tracker
    }

    /// Replace the tracker with a staged copy that has been confirmed
    pub(crate) fn commit_tracker(&mut self, tracker: FunnelTracker) {
        self.tracker = tracker;
    }

    pub fn stage(&self) -> FunnelStage {
        self.tracker.current_stage()
    }

    pub fn interaction_count(&self) -> u32 {
        self.tracker.interaction_count()
    }

    pub fn interest_score(&self) -> u32 {
        self.tracker.interest_score()
    }

    pub fn snapshot(&self) -> FunnelSnapshot {
        self.tracker.snapshot()
    }
}
