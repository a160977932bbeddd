//! `POST /api/agentforce-chat`: relay to the external agent platform.

use crate::api::{require_text, ApiError};
use crate::AppState;
use axum::{extract::rejection::JsonRejection, extract::Extension, Json};
use serde::{Deserialize, Serialize};
use sommelier_agent::AgentError;
use std::sync::Arc;

const CREDENTIALS_NOTE: &str =
    "Set SALESFORCE_CONSUMER_KEY and SALESFORCE_CONSUMER_SECRET for the connected app";
const AUTH_NOTE: &str =
    "Verify the connected app has the client credentials flow enabled with a run-as user";

#[derive(Debug, Deserialize)]
pub struct AgentChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// Session id returned by a previous reply.
    #[serde(default, rename = "conversationId")]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentChatResponse {
    pub response: String,
    #[serde(rename = "conversationId")]
    pub conversation_id: Option<String>,
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        tracing::error!(error = %err, "agent platform request failed");
        match err {
            AgentError::Configuration(details) => {
                ApiError::internal("Salesforce credentials not configured", details)
                    .with_note(CREDENTIALS_NOTE)
            }
            AgentError::Auth { .. } | AgentError::AuthTransport(_) => {
                ApiError::internal("Failed to authenticate with Salesforce", err)
                    .with_note(AUTH_NOTE)
            }
            AgentError::Orchestration { hint, .. } => {
                ApiError::internal("Failed to get response from Agentforce", err).with_note(hint)
            }
            AgentError::Relay(_) => {
                ApiError::internal("Failed to get response from Agentforce", err)
            }
        }
    }
}

/// Handler for `POST /api/agentforce-chat`.
pub async fn agent_chat_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<AgentChatRequest>, JsonRejection>,
) -> Result<Json<AgentChatResponse>, ApiError> {
    let Json(payload) = payload?;
    let message = require_text(payload.message.as_deref(), "Message is required")?;

    let reply = state
        .agent
        .chat(message, payload.conversation_id.as_deref())
        .await?;

    Ok(Json(AgentChatResponse {
        response: reply.text,
        conversation_id: reply.session_id,
    }))
}
