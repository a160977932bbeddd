//! Sending a message to an agent session and waiting for the reply.

use crate::endpoints::Endpoints;
use crate::error::RelayError;
use crate::extract::{extract_reply, latest_agent_reply, parse_message_history};
use crate::fallback::{Strategy, PRIMARY};
use crate::token::BearerToken;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Pause before polling the message history when a send returns no
/// immediate reply.
pub const POLL_DELAY: Duration = Duration::from_millis(3000);

/// Executes endpoint strategies against the agent platform.
#[derive(Debug, Clone)]
pub struct MessageRelay {
    http: reqwest::Client,
    endpoints: Endpoints,
    poll_delay: Duration,
}

impl MessageRelay {
    pub fn new(http: reqwest::Client, endpoints: Endpoints) -> Self {
        Self {
            http,
            endpoints,
            poll_delay: POLL_DELAY,
        }
    }

    /// Overrides [`POLL_DELAY`].
    pub fn with_poll_delay(mut self, poll_delay: Duration) -> Self {
        self.poll_delay = poll_delay;
        self
    }

    pub fn poll_delay(&self) -> Duration {
        self.poll_delay
    }

    /// Sends `text` through the primary session message endpoint.
    pub async fn send_and_await_reply(
        &self,
        token: &BearerToken,
        agent_id: &str,
        session_id: Option<&str>,
        text: &str,
    ) -> Result<String, RelayError> {
        self.attempt(&PRIMARY, token, agent_id, session_id, text)
            .await
    }

    /// Sends `text` using one endpoint shape and extracts the reply.
    pub async fn attempt(
        &self,
        strategy: &Strategy,
        token: &BearerToken,
        agent_id: &str,
        session_id: Option<&str>,
        text: &str,
    ) -> Result<String, RelayError> {
        let url = (strategy.url)(&self.endpoints, agent_id, session_id)
            .ok_or(RelayError::MissingSession)?;
        let payload = (strategy.payload)(text, session_id);

        debug!(strategy = strategy.name, %url, "sending agent message");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&token.value)
            .json(&payload)
            .send()
            .await?;
        let body = read_json(response, strategy.name).await?;

        if let Some(reply) = extract_reply(&body) {
            return Ok(reply);
        }
        if !strategy.poll {
            return Err(RelayError::NoReply);
        }

        debug!(
            strategy = strategy.name,
            delay_ms = self.poll_delay.as_millis() as u64,
            "no immediate reply, polling message history"
        );
        tokio::time::sleep(self.poll_delay).await;

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token.value)
            .send()
            .await?;
        let history = read_json(response, strategy.name).await?;

        latest_agent_reply(parse_message_history(&history)).ok_or(RelayError::NoReply)
    }
}

/// Checks the status and parses the body. A 2xx body that is not JSON reads
/// as `null`, which no extractor matches.
async fn read_json(response: reqwest::Response, strategy: &str) -> Result<Value, RelayError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        warn!(strategy, %status, %body, "agent endpoint returned an error");
        return Err(RelayError::Status { status, body });
    }
    Ok(serde_json::from_str(&body).unwrap_or(Value::Null))
}
