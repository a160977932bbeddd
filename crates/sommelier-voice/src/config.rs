use crate::error::VoiceError;
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    "gpt-4".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    300
}

fn default_tts_model() -> String {
    "tts-1".to_string()
}

fn default_tts_voice() -> String {
    "alloy".to_string()
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

/// Connection and model settings for the LLM provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// API root, without a trailing slash. Defaults to the OpenAI v1 API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Completion length cap. Replies are spoken aloud, so keep it short.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_tts_model")]
    pub tts_model: String,
    #[serde(default = "default_tts_voice")]
    pub tts_voice: String,
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            chat_model: default_chat_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            tts_model: default_tts_model(),
            tts_voice: default_tts_voice(),
            transcription_model: default_transcription_model(),
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("chat_model", &self.chat_model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("tts_model", &self.tts_model)
            .field("tts_voice", &self.tts_voice)
            .field("transcription_model", &self.transcription_model)
            .finish()
    }
}

impl LlmConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Returns the API key or a configuration error naming the variable to set.
    pub(crate) fn require_api_key(&self) -> Result<&str, VoiceError> {
        if self.is_configured() {
            Ok(self.api_key.trim())
        } else {
            Err(VoiceError::Config(
                "LLM API key is not configured. Set CHATGPT_API_KEY.".to_string(),
            ))
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}
