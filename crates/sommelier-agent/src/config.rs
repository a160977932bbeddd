use serde::Deserialize;
use std::fmt;

pub const DEFAULT_DOMAIN: &str = "https://login.salesforce.com";
pub const DEFAULT_AGENT_ID: &str = "0XxHo000000h3tdKAA";
pub const DEFAULT_API_VERSION: &str = "v60.0";

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

fn default_agent_id() -> String {
    DEFAULT_AGENT_ID.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

/// Connection settings for the agent platform.
///
/// An empty `client_id` or `client_secret` means the integration is not
/// configured; requests then fail with a configuration error instead of
/// reaching the network.
#[derive(Clone, Deserialize)]
pub struct AgentConfig {
    /// Base URL of the org, e.g. `https://acme.my.salesforce.com`.
    #[serde(default = "default_domain")]
    pub domain: String,
    /// Connected-app consumer key.
    #[serde(default)]
    pub client_id: String,
    /// Connected-app consumer secret.
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_agent_id")]
    pub agent_id: String,
    /// REST API version segment, including the leading `v`.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            client_id: String::new(),
            client_secret: String::new(),
            agent_id: default_agent_id(),
            api_version: default_api_version(),
        }
    }
}

impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("domain", &self.domain)
            .field("client_id", &redacted(&self.client_id))
            .field("client_secret", &redacted(&self.client_secret))
            .field("agent_id", &self.agent_id)
            .field("api_version", &self.api_version)
            .finish()
    }
}

fn redacted(value: &str) -> &'static str {
    if value.is_empty() {
        "<unset>"
    } else {
        "[REDACTED]"
    }
}

impl AgentConfig {
    /// Returns the OAuth client pair, or `None` when either half is missing.
    pub fn credentials(&self) -> Option<ClientCredentials> {
        ClientCredentials::new(&self.client_id, &self.client_secret)
    }
}

/// OAuth client-credentials pair.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    /// Builds a credential pair, rejecting blank halves.
    pub fn new(client_id: &str, client_secret: &str) -> Option<Self> {
        let client_id = client_id.trim();
        let client_secret = client_secret.trim();
        if client_id.is_empty() || client_secret.is_empty() {
            return None;
        }
        Some(Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}
