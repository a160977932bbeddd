//! Messages exchanged with the external agent platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored an agent-platform message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Agent,
}

impl Sender {
    /// Classifies an author discriminator as found in platform message
    /// histories. Field values differ between API generations, so matching is
    /// case-insensitive and accepts several spellings for the agent side.
    ///
    /// Returns `None` for discriminators that identify neither party.
    pub fn classify(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "agent" | "assistant" | "bot" | "chatbot" => Some(Self::Agent),
            "user" | "enduser" | "end_user" | "customer" => Some(Self::User),
            _ => None,
        }
    }
}

/// A message as reported by the agent platform.
///
/// Ephemeral: built while parsing one poll response and dropped with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentMessage {
    pub text: String,
    pub sender: Sender,
    pub timestamp: Option<DateTime<Utc>>,
}
