//! Shared helpers: a combined LLM/agent-platform upstream and request
//! plumbing for driving the router in-process.

#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::Value;
use sommelier_server::{app, config::Config, AppState};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const AGENT_ID: &str = "agent-1";

/// What the upstream answers with.
pub enum Reply {
    Json(StatusCode, Value),
    Bytes(&'static str, Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct Seen {
    pub method: Method,
    pub path: String,
    pub body: Vec<u8>,
}

type Responder = dyn Fn(&Seen) -> Reply + Send + Sync;

#[derive(Clone)]
struct UpstreamState {
    seen: Arc<Mutex<Vec<Seen>>>,
    responder: Arc<Responder>,
}

pub struct Upstream {
    pub base_url: String,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Upstream {
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&Seen) -> Reply + Send + Sync + 'static,
    {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = UpstreamState {
            seen: seen.clone(),
            responder: Arc::new(responder),
        };
        let router = Router::new().fallback(handle).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            seen,
        }
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.seen().into_iter().map(|s| s.path).collect()
    }

    /// Config pointing both the LLM provider and the agent platform here.
    pub fn config(&self, static_dir: &Path) -> Config {
        let mut config = Config::default();
        config.llm.api_key = "sk-test".to_string();
        config.llm.base_url = format!("{}/v1", self.base_url);
        config.agent.domain = self.base_url.clone();
        config.agent.client_id = "consumer-key".to_string();
        config.agent.client_secret = "consumer-secret".to_string();
        config.agent.agent_id = AGENT_ID.to_string();
        config.static_files.dir = static_dir.to_path_buf();
        config
    }
}

async fn handle(
    State(state): State<UpstreamState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let seen = Seen {
        method,
        path: uri.path().to_string(),
        body: body.to_vec(),
    };
    state.seen.lock().unwrap().push(seen.clone());

    match (state.responder)(&seen) {
        Reply::Json(status, value) => (status, axum::Json(value)).into_response(),
        Reply::Bytes(content_type, bytes) => {
            ([(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
    }
}

pub fn router(config: &Config) -> Router {
    app(AppState::from_config(config))
}

pub async fn post_json(router: Router, uri: &str, body: Value) -> Response {
    router
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Posts `body` verbatim, with `content_type` if given.
pub async fn post_raw(
    router: Router,
    uri: &str,
    content_type: Option<&str>,
    body: &'static str,
) -> Response {
    let mut request = Request::builder().method(Method::POST).uri(uri);
    if let Some(content_type) = content_type {
        request = request.header(header::CONTENT_TYPE, content_type);
    }
    router
        .oneshot(request.body(Body::from(body)).unwrap())
        .await
        .unwrap()
}

pub async fn get(router: Router, uri: &str) -> Response {
    router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
