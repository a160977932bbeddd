use crate::config::LlmConfig;
use crate::error::{ensure_success, VoiceError};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Maximum text input size for TTS, matching the provider's per-request cap.
const MAX_TTS_INPUT_BYTES: usize = 4096;

/// Timeout for a single synthesis request.
const TTS_TIMEOUT: Duration = Duration::from_secs(60);

/// Service for rendering replies as MP3 audio.
#[derive(Debug, Clone)]
pub struct TtsService {
    http: reqwest::Client,
    config: LlmConfig,
}

impl TtsService {
    pub fn new(http: reqwest::Client, config: LlmConfig) -> Self {
        Self { http, config }
    }

    /// Synthesizes speech for `text`.
    ///
    /// Returns `audio/mpeg` bytes exactly as the provider produced them.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, VoiceError> {
        if text.trim().is_empty() {
            return Err(VoiceError::InvalidInput("text is empty".to_string()));
        }
        if text.len() > MAX_TTS_INPUT_BYTES {
            return Err(VoiceError::InvalidInput(format!(
                "text exceeds maximum size: {} bytes (limit: {} bytes)",
                text.len(),
                MAX_TTS_INPUT_BYTES
            )));
        }
        let api_key = self.config.require_api_key()?;

        debug!(
            model = %self.config.tts_model,
            voice = %self.config.tts_voice,
            chars = text.len(),
            "synthesizing speech"
        );

        let response = self
            .http
            .post(self.config.url("audio/speech"))
            .bearer_auth(api_key)
            .timeout(TTS_TIMEOUT)
            .json(&json!({
                "model": self.config.tts_model,
                "voice": self.config.tts_voice,
                "input": text,
            }))
            .send()
            .await?;

        let audio = ensure_success(response, "tts").await?.bytes().await?;
        Ok(audio.to_vec())
    }
}
