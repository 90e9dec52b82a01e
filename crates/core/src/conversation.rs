//! Conversation turns

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// The prospect typing into the chat
    User,
    /// The sales agent
    Agent,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Agent => "agent",
        }
    }
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single conversation turn
///
/// Turns are immutable once created. `index` is the creation order inside
/// the owning session, starting at zero with the greeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    role: TurnRole,
    content: String,
    index: usize,
    created_at: DateTime<Utc>,
}

impl Turn {
    /// Create a new turn
    pub fn new(role: TurnRole, content: impl Into<String>, index: usize) -> Self {
        Self {
            role,
            content: content.into(),
            index,
            created_at: Utc::now(),
        }
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>, index: usize) -> Self {
        Self::new(TurnRole::User, content, index)
    }

    /// Create an agent turn
    pub fn agent(content: impl Into<String>, index: usize) -> Self {
        Self::new(TurnRole::Agent, content, index)
    }

    pub fn role(&self) -> TurnRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_user(&self) -> bool {
        self.role == TurnRole::User
    }
}
