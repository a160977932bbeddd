//! In-process stand-in for the agent platform.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::Value;
use sommelier_agent::AgentConfig;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const AGENT_ID: &str = "agent-1";
pub const TOKEN_PATH: &str = "/services/oauth2/token";
pub const SESSIONS_PATH: &str = "/services/data/v60.0/einstein/ai-agent/agents/agent-1/sessions";
pub const CHAT_PATH: &str = "/services/data/v60.0/einstein/ai-agent/agents/agent-1/chat";

pub fn primary_path(session_id: &str) -> String {
    format!("/services/data/v60.0/einstein/ai-agent/sessions/{session_id}/messages")
}

pub fn alternate_path(session_id: &str) -> String {
    format!("/services/data/v60.0/chatbot/agents/agent-1/sessions/{session_id}/messages")
}

/// A request as seen by the mock.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub raw: String,
    pub json: Value,
}

type Responder = dyn Fn(&Recorded) -> (StatusCode, Value) + Send + Sync;

#[derive(Clone)]
struct MockState {
    log: Arc<Mutex<Vec<Recorded>>>,
    responder: Arc<Responder>,
}

pub struct MockPlatform {
    pub base_url: String,
    log: Arc<Mutex<Vec<Recorded>>>,
}

impl MockPlatform {
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&Recorded) -> (StatusCode, Value) + Send + Sync + 'static,
    {
        let log = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            log: log.clone(),
            responder: Arc::new(responder),
        };
        let app = Router::new().fallback(handle).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            log,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<(Method, String)> {
        self.requests()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn config(&self) -> AgentConfig {
        AgentConfig {
            domain: self.base_url.clone(),
            client_id: "consumer-key".to_string(),
            client_secret: "consumer-secret".to_string(),
            agent_id: AGENT_ID.to_string(),
            api_version: "v60.0".to_string(),
        }
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let raw = String::from_utf8_lossy(&body).to_string();
    let recorded = Recorded {
        method,
        path: uri.path().to_string(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        json: serde_json::from_str(&raw).unwrap_or(Value::Null),
        raw,
    };
    state.log.lock().unwrap().push(recorded.clone());

    let (status, body) = (state.responder)(&recorded);
    (status, Json(body)).into_response()
}

/// Answers the token and session-creation calls; everything else goes to
/// `rest`.
pub fn with_auth_and_session<F>(session_id: &'static str, rest: F) -> impl Fn(&Recorded) -> (StatusCode, Value) + Send + Sync + 'static
where
    F: Fn(&Recorded) -> (StatusCode, Value) + Send + Sync + 'static,
{
    move |req| match req.path.as_str() {
        TOKEN_PATH => (
            StatusCode::OK,
            serde_json::json!({ "access_token": "test-token", "expires_in": 7200 }),
        ),
        SESSIONS_PATH => (
            StatusCode::OK,
            serde_json::json!({ "sessionId": session_id }),
        ),
        _ => rest(req),
    }
}
