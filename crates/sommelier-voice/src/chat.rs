use crate::config::LlmConfig;
use crate::error::{ensure_success, VoiceError};
use serde::{Deserialize, Serialize};
use sommelier_types::ChatMessage;
use tracing::debug;

/// Persona prepended to every voice conversation.
pub const SOMMELIER_SYSTEM_PROMPT: &str = "You are a sophisticated sommelier assistant for \
Sommalier Gent, a wine recommendation service. You help customers find the perfect wine based \
on their preferences, food pairings, and occasions. Be knowledgeable, elegant, and \
conversational. Keep responses concise for voice interactions.";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat completions with the sommelier persona.
#[derive(Debug, Clone)]
pub struct ChatService {
    http: reqwest::Client,
    config: LlmConfig,
}

impl ChatService {
    pub fn new(http: reqwest::Client, config: LlmConfig) -> Self {
        Self { http, config }
    }

    /// Builds the message list sent upstream: persona, prior turns, then the
    /// new user message.
    pub fn conversation(history: &[ChatMessage], message: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(SOMMELIER_SYSTEM_PROMPT));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(message));
        messages
    }

    /// Returns the assistant's reply to `message` given the prior `history`.
    pub async fn complete(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, VoiceError> {
        let api_key = self.config.require_api_key()?;
        let request = CompletionRequest {
            model: &self.config.chat_model,
            messages: Self::conversation(history, message),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        debug!(
            model = request.model,
            turns = request.messages.len(),
            "requesting chat completion"
        );

        let response = self
            .http
            .post(self.config.url("chat/completions"))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;
        let completion: CompletionResponse =
            ensure_success(response, "chat").await?.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| VoiceError::Decode("completion contained no message content".to_string()))
    }
}
