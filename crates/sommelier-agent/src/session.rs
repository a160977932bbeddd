//! Agent session negotiation.

use crate::endpoints::Endpoints;
use crate::error::RelayError;
use crate::token::BearerToken;
use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// A freshly created agent session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// Generates the opaque client-side key sent with a session creation call.
pub fn external_session_key(now: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("session-{}-{}", now.timestamp_millis(), suffix)
}

/// Opens agent sessions, or passes caller-held ones through untouched.
#[derive(Debug, Clone)]
pub struct SessionNegotiator {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl SessionNegotiator {
    pub fn new(http: reqwest::Client, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }

    /// Returns the session id to use for this message.
    ///
    /// A caller-supplied id is reused without validation. Otherwise a new
    /// session is created; if that fails the failure is logged and `None` is
    /// returned, leaving the message send to fail downstream.
    pub async fn ensure_session(
        &self,
        token: &BearerToken,
        agent_id: &str,
        existing_id: Option<&str>,
    ) -> Option<String> {
        if let Some(id) = existing_id.filter(|id| !id.trim().is_empty()) {
            debug!(session_id = id, "reusing caller-supplied agent session");
            return Some(id.to_string());
        }

        match self.create_session(token, agent_id).await {
            Ok(session) => Some(session.id),
            Err(e) => {
                warn!(agent_id, error = %e, "agent session creation failed, continuing without one");
                None
            }
        }
    }

    /// Creates a new session for `agent_id`.
    pub async fn create_session(
        &self,
        token: &BearerToken,
        agent_id: &str,
    ) -> Result<Session, RelayError> {
        let created_at = Utc::now();
        let payload = json!({
            "externalSessionKey": external_session_key(created_at),
            "instanceConfig": { "endpoint": self.endpoints.domain() },
            "bypassUser": true,
        });

        let response = self
            .http
            .post(self.endpoints.sessions(agent_id))
            .bearer_auth(&token.value)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RelayError::Status { status, body });
        }

        let parsed: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        let id = ["sessionId", "id"]
            .iter()
            .find_map(|field| parsed.get(field)?.as_str())
            .filter(|id| !id.is_empty())
            .ok_or(RelayError::MissingSession)?;

        info!(session_id = id, agent_id, "created agent session");

        Ok(Session {
            id: id.to_string(),
            created_at,
        })
    }
}
