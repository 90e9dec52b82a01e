//! Core traits and types for the Vanguard sales agent
//!
//! This crate provides foundational types used across all other crates:
//! - Conversation turns and roles
//! - LLM request/response types
//! - The `LanguageModel` trait for pluggable generation backends
//! - Error types

pub mod conversation;
pub mod error;
pub mod llm_types;
pub mod traits;

pub use conversation::{Turn, TurnRole};
pub use error::{Error, Result};
pub use llm_types::{FinishReason, GenerateRequest, GenerateResponse, Message, Role, TokenUsage};
pub use traits::LanguageModel;
