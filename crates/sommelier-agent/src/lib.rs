//! Agent-platform orchestration for the Sommelier backend.
//!
//! Talks to a Salesforce Agentforce agent on behalf of the browser:
//! acquires and caches an OAuth client-credentials token, opens (or reuses)
//! an agent session, relays the user's message and digs the agent's reply
//! out of whichever response shape the platform returns. When the primary
//! message endpoint fails, a short fallback chain of alternate endpoint
//! shapes is tried before giving up.
//!
//! No state survives between requests except the cached bearer token; the
//! session id is round-tripped through the caller.

pub mod config;
pub mod endpoints;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod orchestrator;
pub mod relay;
pub mod session;
pub mod token;

pub use config::{AgentConfig, ClientCredentials};
pub use endpoints::Endpoints;
pub use error::{AgentError, AttemptFailure, RelayError};
pub use fallback::{FallbackChain, Strategy};
pub use orchestrator::{AgentOrchestrator, AgentReply};
pub use relay::{MessageRelay, POLL_DELAY};
pub use session::{Session, SessionNegotiator};
pub use token::{BearerToken, Clock, OAuthAcquirer, SystemClock, TokenAcquirer, TokenStore};
