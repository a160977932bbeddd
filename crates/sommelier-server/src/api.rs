//! Shared API error envelope.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sommelier_voice::VoiceError;
use thiserror::Error;

/// API error type mapping to HTTP status codes.
///
/// Internal failures render as `{error, details, note?}`; the `error` string
/// is a stable, client-facing summary and `details` carries the provider's
/// text.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("{error}: {details}")]
    Internal {
        error: String,
        details: String,
        note: Option<String>,
    },
}

impl ApiError {
    pub fn internal(error: impl Into<String>, details: impl ToString) -> Self {
        ApiError::Internal {
            error: error.into(),
            details: details.to_string(),
            note: None,
        }
    }

    pub fn with_note(self, note: impl Into<String>) -> Self {
        match self {
            ApiError::Internal { error, details, .. } => ApiError::Internal {
                error,
                details,
                note: Some(note.into()),
            },
            other => other,
        }
    }

    /// Maps an LLM-side failure. Bad caller input stays a 400; everything
    /// else is reported under `summary`.
    pub fn from_voice(summary: &str, err: VoiceError) -> Self {
        match err {
            VoiceError::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => {
                tracing::error!(summary, error = %other, "LLM provider call failed");
                ApiError::internal(summary, other)
            }
        }
    }
}

/// Malformed bodies, wrong content types and mistyped fields are caller
/// errors like any other missing field.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), "rejected request body");
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Internal {
                error,
                details,
                note,
            } => {
                let mut body = json!({ "error": error, "details": details });
                if let Some(note) = note {
                    body["note"] = json!(note);
                }
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

/// Returns the trimmed value of a required text field, or a 400 naming it.
pub(crate) fn require_text<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, ApiError> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest(message.to_string()))
}
