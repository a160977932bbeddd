use crate::config::LlmConfig;
use crate::error::{ensure_success, VoiceError};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Maximum audio input size for STT (25 MiB), the provider's upload cap.
const MAX_STT_INPUT_BYTES: usize = 25 * 1024 * 1024;

/// Timeout for a single transcription request.
const STT_TIMEOUT: Duration = Duration::from_secs(120);

/// Browsers record through `MediaRecorder`, which produces WebM/Opus.
const UPLOAD_FILE_NAME: &str = "audio.webm";
const UPLOAD_MIME: &str = "audio/webm";

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Clone)]
pub struct SttService {
    http: reqwest::Client,
    config: LlmConfig,
}

impl SttService {
    pub fn new(http: reqwest::Client, config: LlmConfig) -> Self {
        Self { http, config }
    }

    pub async fn transcribe(&self, audio_data: &[u8]) -> Result<String, VoiceError> {
        if audio_data.is_empty() {
            return Err(VoiceError::InvalidInput("audio is empty".to_string()));
        }
        if audio_data.len() > MAX_STT_INPUT_BYTES {
            return Err(VoiceError::InvalidInput(format!(
                "audio data exceeds maximum size: {} bytes (limit: {} bytes)",
                audio_data.len(),
                MAX_STT_INPUT_BYTES
            )));
        }
        let api_key = self.config.require_api_key()?;

        let file = Part::bytes(audio_data.to_vec())
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(UPLOAD_MIME)?;
        let form = Form::new()
            .text("model", self.config.transcription_model.clone())
            .part("file", file);

        debug!(bytes = audio_data.len(), "transcribing audio");

        let response = self
            .http
            .post(self.config.url("audio/transcriptions"))
            .bearer_auth(api_key)
            .timeout(STT_TIMEOUT)
            .multipart(form)
            .send()
            .await?;

        let transcription: TranscriptionResponse =
            ensure_success(response, "transcribe").await?.json().await?;
        Ok(transcription.text.trim().to_string())
    }
}
