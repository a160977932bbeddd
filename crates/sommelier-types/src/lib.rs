//! Shared wire types for the Sommelier voice-chat backend.
//!
//! Holds the conversation turn types the browser exchanges with the LLM
//! routes and the message types parsed from the agent platform. Nothing in
//! here is persisted; every value lives for a single request/response cycle.

pub mod agent;
pub mod chat;

pub use agent::{AgentMessage, Sender};
pub use chat::{ChatMessage, ChatRole};
