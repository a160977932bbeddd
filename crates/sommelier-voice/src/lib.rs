//! LLM-backed voice features for the Sommelier backend.
//!
//! Wraps an OpenAI-compatible HTTP API: chat completions drive the
//! sommelier persona, `audio/speech` renders replies as MP3 for the browser
//! to play back, and `audio/transcriptions` turns recorded speech into text.
//!
//! Every call is a direct pass-through; nothing is cached or retried.

pub mod chat;
pub mod config;
pub mod error;
pub mod stt;
pub mod tts;

pub use chat::{ChatService, SOMMELIER_SYSTEM_PROMPT};
pub use config::LlmConfig;
pub use error::VoiceError;
pub use stt::SttService;
pub use tts::TtsService;
