use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single endpoint shape to produce a reply.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("upstream returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("no session id available for a session-scoped endpoint")]
    MissingSession,

    #[error("no agent reply found in response")]
    NoReply,
}

/// One failed step of the fallback chain.
#[derive(Debug)]
pub struct AttemptFailure {
    pub strategy: &'static str,
    pub error: RelayError,
}

fn summarize(attempts: &[AttemptFailure]) -> String {
    attempts
        .iter()
        .map(|a| format!("{}: {}", a.strategy, a.error))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum AgentError {
    /// Required secrets are missing. Fatal for the request, not the process.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The OAuth exchange was rejected by the identity endpoint.
    #[error("authentication rejected ({status}): {body}")]
    Auth { status: StatusCode, body: String },

    /// The OAuth exchange never got a response.
    #[error("authentication request failed: {0}")]
    AuthTransport(#[source] reqwest::Error),

    #[error(transparent)]
    Relay(#[from] RelayError),

    /// Every endpoint shape in the fallback chain failed.
    #[error("all agent endpoint attempts failed ({})", summarize(.attempts))]
    Orchestration {
        attempts: Vec<AttemptFailure>,
        hint: &'static str,
    },
}
