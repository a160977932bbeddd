//! Ordered endpoint shapes tried when sending a message.

use crate::endpoints::Endpoints;
use crate::error::{AgentError, AttemptFailure};
use crate::relay::MessageRelay;
use crate::token::BearerToken;
use serde_json::{json, Value};
use std::fmt;
use tracing::{info, warn};

/// Hint attached to the terminal error once every shape has failed.
pub const INTEGRATION_HINT: &str =
    "Check the Agentforce agent id, the connected app's OAuth scopes and the org's Agent API access";

/// One way of delivering a message to the agent platform.
#[derive(Clone, Copy)]
pub struct Strategy {
    pub name: &'static str,
    /// Builds the target URL. `None` means the shape cannot be used without a
    /// session id.
    pub url: fn(&Endpoints, &str, Option<&str>) -> Option<String>,
    pub payload: fn(&str, Option<&str>) -> Value,
    /// Whether to poll the same URL for history when no reply comes back.
    pub poll: bool,
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy")
            .field("name", &self.name)
            .field("poll", &self.poll)
            .finish_non_exhaustive()
    }
}

fn session_messages_url(
    endpoints: &Endpoints,
    _agent_id: &str,
    session_id: Option<&str>,
) -> Option<String> {
    Some(endpoints.session_messages(session_id?))
}

fn chatbot_messages_url(
    endpoints: &Endpoints,
    agent_id: &str,
    session_id: Option<&str>,
) -> Option<String> {
    Some(endpoints.chatbot_messages(agent_id, session_id?))
}

fn agent_chat_url(endpoints: &Endpoints, agent_id: &str, _session_id: Option<&str>) -> Option<String> {
    Some(endpoints.agent_chat(agent_id))
}

fn input_payload(text: &str, _session_id: Option<&str>) -> Value {
    json!({ "input": { "text": text } })
}

fn message_payload(text: &str, _session_id: Option<&str>) -> Value {
    json!({ "message": { "text": text } })
}

fn flat_payload(text: &str, session_id: Option<&str>) -> Value {
    json!({ "message": text, "sessionId": session_id })
}

/// Session message endpoint with an `{input: {text}}` body.
pub const PRIMARY: Strategy = Strategy {
    name: "primary",
    url: session_messages_url,
    payload: input_payload,
    poll: true,
};

/// Resource-style chatbot endpoint with a `{message: {text}}` body.
pub const ALTERNATE_RESOURCE: Strategy = Strategy {
    name: "alternate-resource",
    url: chatbot_messages_url,
    payload: message_payload,
    poll: true,
};

/// Generic agent chat endpoint with a flat `{message, sessionId}` body.
pub const GENERIC_CHAT: Strategy = Strategy {
    name: "generic-chat",
    url: agent_chat_url,
    payload: flat_payload,
    poll: false,
};

/// Tries strategies in order until one yields a reply.
///
/// The first strategy is the primary shape; the rest only run after it
/// fails.
#[derive(Debug, Clone)]
pub struct FallbackChain {
    strategies: Vec<Strategy>,
}

impl Default for FallbackChain {
    fn default() -> Self {
        Self::new(vec![PRIMARY, ALTERNATE_RESOURCE, GENERIC_CHAT])
    }
}

impl FallbackChain {
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub async fn run(
        &self,
        relay: &MessageRelay,
        token: &BearerToken,
        agent_id: &str,
        session_id: Option<&str>,
        text: &str,
    ) -> Result<String, AgentError> {
        let mut attempts = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            match relay
                .attempt(strategy, token, agent_id, session_id, text)
                .await
            {
                Ok(reply) => {
                    if !attempts.is_empty() {
                        info!(
                            strategy = strategy.name,
                            failed = attempts.len(),
                            "agent reply obtained through fallback endpoint"
                        );
                    }
                    return Ok(reply);
                }
                Err(error) => {
                    warn!(strategy = strategy.name, %error, "agent endpoint attempt failed");
                    attempts.push(AttemptFailure {
                        strategy: strategy.name,
                        error,
                    });
                }
            }
        }

        Err(AgentError::Orchestration {
            attempts,
            hint: INTEGRATION_HINT,
        })
    }
}
