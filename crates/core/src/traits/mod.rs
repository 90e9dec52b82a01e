//! Core traits for the sales agent
//!
//! Generation backends implement [`LanguageModel`] so the agent can be driven
//! by a remote chat-completion service in production and a scripted mock in tests.

mod llm;

pub use llm::LanguageModel;
