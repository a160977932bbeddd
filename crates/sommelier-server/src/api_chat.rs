//! `POST /api/voice-chat`: sommelier persona over the LLM provider.

use crate::api::{require_text, ApiError};
use crate::AppState;
use axum::{extract::rejection::JsonRejection, extract::Extension, Json};
use serde::{Deserialize, Serialize};
use sommelier_types::ChatMessage;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct VoiceChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// Prior turns, oldest first.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceChatResponse {
    pub response: String,
}

/// Handler for `POST /api/voice-chat`.
pub async fn voice_chat_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<VoiceChatRequest>, JsonRejection>,
) -> Result<Json<VoiceChatResponse>, ApiError> {
    let Json(payload) = payload?;
    let message = require_text(payload.message.as_deref(), "Message is required")?;

    let response = state
        .chat_service
        .complete(&payload.history, message)
        .await
        .map_err(|e| ApiError::from_voice("Failed to process request", e))?;

    Ok(Json(VoiceChatResponse { response }))
}
