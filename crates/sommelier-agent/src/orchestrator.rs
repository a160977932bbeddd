//! End-to-end agent conversation turn.

use crate::config::AgentConfig;
use crate::endpoints::Endpoints;
use crate::error::AgentError;
use crate::fallback::FallbackChain;
use crate::relay::MessageRelay;
use crate::session::SessionNegotiator;
use crate::token::{OAuthAcquirer, TokenStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// The agent's answer plus the session id the caller should send next time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReply {
    pub text: String,
    pub session_id: Option<String>,
}

/// Drives token → session → relay → fallback for one message.
pub struct AgentOrchestrator {
    agent_id: String,
    tokens: TokenStore,
    negotiator: SessionNegotiator,
    relay: MessageRelay,
    chain: FallbackChain,
}

impl AgentOrchestrator {
    /// Builds an orchestrator that authenticates with the OAuth pair from
    /// `config`.
    pub fn new(config: &AgentConfig, http: reqwest::Client) -> Self {
        let endpoints = Endpoints::new(&config.domain, &config.api_version);
        let acquirer = OAuthAcquirer::new(http.clone(), endpoints.clone(), config.credentials());
        Self::with_token_store(config, http, TokenStore::new(Arc::new(acquirer)))
    }

    /// Builds an orchestrator around an existing token store.
    pub fn with_token_store(config: &AgentConfig, http: reqwest::Client, tokens: TokenStore) -> Self {
        let endpoints = Endpoints::new(&config.domain, &config.api_version);
        Self {
            agent_id: config.agent_id.clone(),
            tokens,
            negotiator: SessionNegotiator::new(http.clone(), endpoints.clone()),
            relay: MessageRelay::new(http, endpoints),
            chain: FallbackChain::default(),
        }
    }

    pub fn with_poll_delay(mut self, poll_delay: Duration) -> Self {
        self.relay = self.relay.with_poll_delay(poll_delay);
        self
    }

    pub fn with_fallback_chain(mut self, chain: FallbackChain) -> Self {
        self.chain = chain;
        self
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Sends `message` to the agent and returns its reply.
    ///
    /// `conversation_id` is the session id returned by a previous call, if
    /// any. Configuration and authentication failures surface immediately;
    /// relay failures go through the fallback chain first.
    pub async fn chat(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<AgentReply, AgentError> {
        let token = self.tokens.get_token().await?;

        let session_id = self
            .negotiator
            .ensure_session(&token, &self.agent_id, conversation_id)
            .await;
        debug!(session_id = session_id.as_deref().unwrap_or("<none>"), "relaying agent message");

        let text = self
            .chain
            .run(
                &self.relay,
                &token,
                &self.agent_id,
                session_id.as_deref(),
                message,
            )
            .await?;

        Ok(AgentReply { text, session_id })
    }
}
