//! Speech endpoints: synthesis and transcription.

use crate::api::{require_text, ApiError};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TranscribeRequest {
    /// Recorded audio, base64-encoded. A `data:` URL prefix is tolerated.
    #[serde(default)]
    pub audio: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscribeResponse {
    pub text: String,
}

/// Handler for `POST /api/tts`. Responds with raw `audio/mpeg`.
pub async fn tts_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<TtsRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let text = require_text(payload.text.as_deref(), "Text is required")?;

    let audio = state
        .tts_service
        .synthesize(text)
        .await
        .map_err(|e| ApiError::from_voice("Failed to generate speech", e))?;

    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response())
}

/// Strips an optional `data:<mime>;base64,` prefix.
fn strip_data_url(encoded: &str) -> &str {
    match encoded.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => encoded,
    }
}

/// Handler for `POST /api/transcribe`.
pub async fn transcribe_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<TranscribeRequest>, JsonRejection>,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let Json(payload) = payload?;
    let encoded = require_text(payload.audio.as_deref(), "Audio is required")?;
    let audio = B64
        .decode(strip_data_url(encoded))
        .map_err(|e| ApiError::BadRequest(format!("audio is not valid base64: {}", e)))?;

    let text = state
        .stt_service
        .transcribe(&audio)
        .await
        .map_err(|e| ApiError::from_voice("Failed to transcribe audio", e))?;

    Ok(Json(TranscribeResponse { text }))
}
