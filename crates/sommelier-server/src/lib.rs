//! Sommelier server library logic.

pub mod api;
pub mod api_agent;
pub mod api_chat;
pub mod api_voice;
pub mod config;

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Extension, Json, Router};
use serde_json::{json, Value};
use sommelier_agent::AgentOrchestrator;
use sommelier_voice::{ChatService, SttService, TtsService};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Default ceiling for JSON request bodies.
pub const MAX_REQUEST_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Ceiling for `/api/transcribe`, whose body carries base64 audio.
pub const MAX_TRANSCRIBE_BODY_BYTES: usize = 40 * 1024 * 1024;

/// HTML pages served at fixed paths, relative to the static directory.
const PAGES: &[(&str, &str)] = &[
    ("/", "index.html"),
    ("/voice", "voice.html"),
    ("/voice2", "voice2.html"),
    ("/voice3", "voice3.html"),
];

/// Application state shared across all request handlers.
pub struct AppState {
    pub chat_service: Arc<ChatService>,
    pub tts_service: Arc<TtsService>,
    pub stt_service: Arc<SttService>,
    /// Agent platform client; owns the process-wide token cache.
    pub agent: Arc<AgentOrchestrator>,
    pub static_dir: PathBuf,
}

impl AppState {
    /// Builds every service from `config`, sharing one HTTP connection pool.
    pub fn from_config(config: &config::Config) -> Self {
        Self::with_http(config, reqwest::Client::new())
    }

    pub fn with_http(config: &config::Config, http: reqwest::Client) -> Self {
        if !config.llm.is_configured() {
            tracing::warn!("CHATGPT_API_KEY is not set; LLM endpoints will fail");
        }
        if config.agent.credentials().is_none() {
            tracing::warn!("Salesforce consumer key/secret not set; agent endpoint will fail");
        }

        Self {
            chat_service: Arc::new(ChatService::new(http.clone(), config.llm.clone())),
            tts_service: Arc::new(TtsService::new(http.clone(), config.llm.clone())),
            stt_service: Arc::new(SttService::new(http.clone(), config.llm.clone())),
            agent: Arc::new(AgentOrchestrator::new(&config.agent, http)),
            static_dir: config.static_files.dir.clone(),
        }
    }
}

/// Health check handler.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let transcribe_routes = Router::new()
        .route("/api/transcribe", post(api_voice::transcribe_handler))
        .layer(DefaultBodyLimit::max(MAX_TRANSCRIBE_BODY_BYTES));

    let api_routes = Router::new()
        .route("/api/voice-chat", post(api_chat::voice_chat_handler))
        .route("/api/agentforce-chat", post(api_agent::agent_chat_handler))
        .route("/api/tts", post(api_voice::tts_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES));

    let mut router = Router::new()
        .route("/health", get(health))
        .merge(api_routes)
        .merge(transcribe_routes);

    let static_dir = &state.static_dir;
    if !static_dir.join("index.html").exists() {
        tracing::warn!(path = %static_dir.display(), "static directory has no index.html");
    }
    for (path, file) in PAGES {
        router = router.route_service(path, ServeFile::new(static_dir.join(file)));
    }
    let router = router.fallback_service(ServeDir::new(static_dir));

    router
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
