//! LLM conversation turns.

use serde::{Deserialize, Serialize};

/// Author of a chat turn, in the role vocabulary of chat-completion APIs.
///
/// Roles outside the core three are carried through verbatim so browser
/// history reaches the provider unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Other(String),
}

impl From<String> for ChatRole {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "system" => ChatRole::System,
            "user" => ChatRole::User,
            "assistant" => ChatRole::Assistant,
            _ => ChatRole::Other(raw),
        }
    }
}

impl From<ChatRole> for String {
    fn from(role: ChatRole) -> Self {
        match role {
            ChatRole::System => "system".to_string(),
            ChatRole::User => "user".to_string(),
            ChatRole::Assistant => "assistant".to_string(),
            ChatRole::Other(raw) => raw,
        }
    }
}

/// A single turn of an LLM conversation.
///
/// The browser keeps the running history and sends it back with every
/// `/api/voice-chat` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}
