//! OAuth bearer token acquisition and the single-slot token cache.

use crate::config::ClientCredentials;
use crate::endpoints::Endpoints;
use crate::error::AgentError;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Seconds shaved off the provider-reported lifetime before a token is
/// considered expired.
pub const TOKEN_SAFETY_MARGIN_SECS: i64 = 1800;

/// Lifetime assumed when the identity endpoint omits `expires_in`.
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 7200;

/// A bearer credential for the agent platform.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl BearerToken {
    /// A token is usable strictly before its expiry instant.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Computes the cache expiry for a token issued at `issued_at` with a
/// provider lifetime of `expires_in_secs`.
pub fn token_expiry(issued_at: DateTime<Utc>, expires_in_secs: i64) -> DateTime<Utc> {
    let lifetime = expires_in_secs.saturating_sub(TOKEN_SAFETY_MARGIN_SECS);
    TimeDelta::try_seconds(lifetime)
        .and_then(|delta| issued_at.checked_add_signed(delta))
        .unwrap_or(issued_at)
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Something that can mint a fresh bearer token.
#[async_trait]
pub trait TokenAcquirer: Send + Sync {
    /// Obtains a new token. `issued_at` anchors the expiry computation.
    async fn acquire(&self, issued_at: DateTime<Utc>) -> Result<BearerToken, AgentError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Client-credentials exchange against the org's identity endpoint.
#[derive(Debug, Clone)]
pub struct OAuthAcquirer {
    http: reqwest::Client,
    endpoints: Endpoints,
    credentials: Option<ClientCredentials>,
}

impl OAuthAcquirer {
    pub fn new(
        http: reqwest::Client,
        endpoints: Endpoints,
        credentials: Option<ClientCredentials>,
    ) -> Self {
        Self {
            http,
            endpoints,
            credentials,
        }
    }
}

#[async_trait]
impl TokenAcquirer for OAuthAcquirer {
    async fn acquire(&self, issued_at: DateTime<Utc>) -> Result<BearerToken, AgentError> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            AgentError::Configuration(
                "SALESFORCE_CONSUMER_KEY and SALESFORCE_CONSUMER_SECRET must both be set"
                    .to_string(),
            )
        })?;

        let url = self.endpoints.token();
        debug!(%url, "requesting client-credentials token");

        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(AgentError::AuthTransport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                warn!(%status, error = %e, "failed to read token endpoint error body");
                String::new()
            });
            warn!(%status, %body, "token endpoint rejected client credentials");
            return Err(AgentError::Auth { status, body });
        }

        let token: TokenResponse = response.json().await.map_err(AgentError::AuthTransport)?;
        let expires_in = token.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        let expires_at = token_expiry(issued_at, expires_in);

        info!(expires_in, %expires_at, "acquired agent platform token");

        Ok(BearerToken {
            value: token.access_token,
            expires_at,
        })
    }
}

/// Process-wide cache holding at most one bearer token.
///
/// The slot lock is only held to read or replace the token, never across the
/// network exchange. Concurrent callers that find the token expired may each
/// refresh it; the last writer wins.
pub struct TokenStore {
    slot: Mutex<Option<BearerToken>>,
    acquirer: Arc<dyn TokenAcquirer>,
    clock: Arc<dyn Clock>,
}

impl TokenStore {
    pub fn new(acquirer: Arc<dyn TokenAcquirer>) -> Self {
        Self::with_clock(acquirer, Arc::new(SystemClock))
    }

    pub fn with_clock(acquirer: Arc<dyn TokenAcquirer>, clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: Mutex::new(None),
            acquirer,
            clock,
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<BearerToken>> {
        self.slot.lock().unwrap_or_else(|poisoned| {
            warn!("token slot lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Returns the currently cached token, valid or not.
    pub fn peek(&self) -> Option<BearerToken> {
        self.slot().clone()
    }

    /// Returns a valid token, refreshing it first if absent or expired.
    ///
    /// A failed refresh leaves the slot untouched, so the next call tries
    /// again.
    pub async fn get_token(&self) -> Result<BearerToken, AgentError> {
        let now = self.clock.now();

        let cached = self.slot().clone().filter(|t| t.is_valid_at(now));
        if let Some(token) = cached {
            return Ok(token);
        }

        debug!("agent platform token absent or expired, refreshing");
        let token = self.acquirer.acquire(now).await?;
        *self.slot() = Some(token.clone());
        Ok(token)
    }
}
