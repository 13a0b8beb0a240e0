//! Chat model interface.
//!
//! The system only ever sends a system instruction followed by a single user
//! turn, so the message model is deliberately small: no tool calls, no
//! multi-turn history, no streaming.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single message in a chat exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "content", rename_all = "lowercase")]
pub enum Message {
    /// Instructions that frame the model's behavior.
    System(String),
    /// The user's input.
    Human(String),
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Message::System(content.into())
    }

    /// Create a human (user) message.
    pub fn human(content: impl Into<String>) -> Self {
        Message::Human(content.into())
    }

    /// The message text.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Message::System(s) | Message::Human(s) => s,
        }
    }
}

/// Interface for chat completion models.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a completion for the given messages.
    async fn generate(&self, messages: &[Message]) -> Result<String>;
}
