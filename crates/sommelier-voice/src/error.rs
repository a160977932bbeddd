use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("LLM provider returned {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("LLM provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected LLM provider response: {0}")]
    Decode(String),
}

/// Passes 2xx responses through and turns anything else into
/// [`VoiceError::Upstream`], logging the provider's body.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    operation: &'static str,
) -> Result<reqwest::Response, VoiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_else(|e| {
        tracing::warn!(operation, %status, error = %e, "failed to read LLM provider error body");
        String::new()
    });
    tracing::error!(operation, %status, %body, "LLM provider error");
    Err(VoiceError::Upstream { status, body })
}
