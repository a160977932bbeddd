//! URL layout of the agent platform's REST surface.

/// Builds agent-platform URLs from an org domain and API version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    domain: String,
    api_version: String,
}

impl Endpoints {
    pub fn new(domain: &str, api_version: &str) -> Self {
        Self {
            domain: domain.trim_end_matches('/').to_string(),
            api_version: api_version.trim_matches('/').to_string(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    fn data_root(&self) -> String {
        format!("{}/services/data/{}", self.domain, self.api_version)
    }

    /// OAuth token endpoint.
    pub fn token(&self) -> String {
        format!("{}/services/oauth2/token", self.domain)
    }

    /// Session creation endpoint for an agent.
    pub fn sessions(&self, agent_id: &str) -> String {
        format!(
            "{}/einstein/ai-agent/agents/{}/sessions",
            self.data_root(),
            agent_id
        )
    }

    /// Primary message endpoint of a session.
    pub fn session_messages(&self, session_id: &str) -> String {
        format!(
            "{}/einstein/ai-agent/sessions/{}/messages",
            self.data_root(),
            session_id
        )
    }

    /// Resource-based message endpoint under the chatbot API.
    pub fn chatbot_messages(&self, agent_id: &str, session_id: &str) -> String {
        format!(
            "{}/chatbot/agents/{}/sessions/{}/messages",
            self.data_root(),
            agent_id,
            session_id
        )
    }

    /// Generic, session-less chat endpoint of an agent.
    pub fn agent_chat(&self, agent_id: &str) -> String {
        format!(
            "{}/einstein/ai-agent/agents/{}/chat",
            self.data_root(),
            agent_id
        )
    }
}
