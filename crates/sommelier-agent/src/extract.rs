//! Locating the agent's reply inside platform responses.
//!
//! The agent platform has answered in several JSON shapes over its API
//! generations. Each known shape gets its own extractor; extractors are
//! tried in a fixed order and the first hit wins.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sommelier_types::{AgentMessage, Sender};

/// A single reply-shape probe.
pub type Extractor = fn(&Value) -> Option<String>;

/// Immediate-reply extractors, highest priority first.
pub const REPLY_EXTRACTORS: &[Extractor] = &[output_text, top_level_reply];

const SENDER_FIELDS: &[&str] = &["Sender__c", "sender", "role", "type"];
const TEXT_FIELDS: &[&str] = &["Message__c", "text", "message", "content"];
const TIMESTAMP_FIELDS: &[&str] = &["CreatedDate", "createdAt", "created_at", "timestamp"];
const LIST_FIELDS: &[&str] = &["messages", "records"];

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value?
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// `{"output": {"text": ...}}`
pub fn output_text(body: &Value) -> Option<String> {
    non_empty_str(body.pointer("/output/text"))
}

/// `{"response": ...}`, `{"message": ...}` or `{"text": ...}`, in that order.
pub fn top_level_reply(body: &Value) -> Option<String> {
    ["response", "message", "text"]
        .iter()
        .find_map(|field| non_empty_str(body.get(field)))
}

/// Runs [`REPLY_EXTRACTORS`] in order.
pub fn extract_reply(body: &Value) -> Option<String> {
    REPLY_EXTRACTORS.iter().find_map(|extract| extract(body))
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => DateTime::parse_from_rfc3339(raw)
            // Salesforce record timestamps: 2024-05-01T12:00:00.000+0000
            .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
            .ok()
            .map(|ts| ts.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn parse_message(entry: &Value) -> Option<AgentMessage> {
    let sender = SENDER_FIELDS
        .iter()
        .find_map(|field| entry.get(field)?.as_str().and_then(Sender::classify))?;

    let text = TEXT_FIELDS
        .iter()
        .find_map(|field| non_empty_str(entry.get(field)))
        .or_else(|| output_text(entry))?;

    let timestamp = TIMESTAMP_FIELDS
        .iter()
        .find_map(|field| entry.get(field).and_then(parse_timestamp));

    Some(AgentMessage {
        text,
        sender,
        timestamp,
    })
}

/// Parses a polled message history.
///
/// Accepts a bare array or an array under `messages` / `records`. Entries
/// without a recognizable author or text are skipped.
pub fn parse_message_history(body: &Value) -> Vec<AgentMessage> {
    let entries = body.as_array().or_else(|| {
        LIST_FIELDS
            .iter()
            .find_map(|field| body.get(field)?.as_array())
    });

    entries
        .map(|list| list.iter().filter_map(parse_message).collect())
        .unwrap_or_default()
}

/// Picks the newest agent-authored message. Undated messages rank after
/// dated ones; ties keep their original order.
pub fn latest_agent_reply(mut messages: Vec<AgentMessage>) -> Option<String> {
    messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    messages
        .into_iter()
        .find(|m| m.sender == Sender::Agent)
        .map(|m| m.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn output_text_beats_response_field() {
        let body = json!({ "output": { "text": "A" }, "response": "B" });
        assert_eq!(extract_reply(&body), Some("A".to_string()));
    }

    #[test]
    fn top_level_fields_follow_declared_order() {
        assert_eq!(
            extract_reply(&json!({ "text": "C", "message": "B", "response": "A" })),
            Some("A".to_string())
        );
        assert_eq!(
            extract_reply(&json!({ "text": "C", "message": "B" })),
            Some("B".to_string())
        );
        assert_eq!(extract_reply(&json!({ "text": "C" })), Some("C".to_string()));
    }

    #[test]
    fn empty_and_non_string_fields_are_skipped() {
        let body = json!({
            "output": { "text": "   " },
            "response": { "nested": true },
            "message": "",
            "text": "fallthrough"
        });
        assert_eq!(extract_reply(&body), Some("fallthrough".to_string()));
        assert_eq!(extract_reply(&json!({ "status": "queued" })), None);
        assert_eq!(extract_reply(&Value::Null), None);
    }

    #[test]
    fn history_newest_agent_message_wins() {
        let body = json!([
            { "Sender__c": "Agent", "Message__c": "older", "CreatedDate": "2024-05-01T12:00:00.000+0000" },
            { "Sender__c": "User", "Message__c": "question", "CreatedDate": "2024-05-01T12:00:05.000+0000" },
            { "Sender__c": "Agent", "Message__c": "newest", "CreatedDate": "2024-05-01T12:00:09.000+0000" }
        ]);
        let messages = parse_message_history(&body);
        assert_eq!(messages.len(), 3);
        assert_eq!(latest_agent_reply(messages), Some("newest".to_string()));
    }

    #[test]
    fn history_supports_modern_field_names() {
        let body = json!({
            "messages": [
                { "role": "assistant", "content": "hello", "createdAt": "2024-05-01T12:00:00Z" },
                { "type": "bot", "output": { "text": "latest" }, "timestamp": 1714564810000_i64 },
                { "sender": "user", "text": "hi", "timestamp": 1714564900000_i64 }
            ]
        });
        assert_eq!(
            latest_agent_reply(parse_message_history(&body)),
            Some("latest".to_string())
        );
    }

    #[test]
    fn unrecognized_author_falls_through_to_later_field() {
        let body = json!([
            { "sender": "Sommelier Bot", "role": "assistant", "text": "Try a Malbec" }
        ]);
        let messages = parse_message_history(&body);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, Sender::Agent);
        assert_eq!(latest_agent_reply(messages), Some("Try a Malbec".to_string()));
    }

    #[test]
    fn undated_messages_rank_last() {
        let body = json!({
            "records": [
                { "sender": "agent", "text": "undated" },
                { "sender": "agent", "text": "dated", "createdAt": "2024-05-01T12:00:00Z" }
            ]
        });
        assert_eq!(
            latest_agent_reply(parse_message_history(&body)),
            Some("dated".to_string())
        );
    }

    #[test]
    fn history_without_agent_messages_yields_nothing() {
        let body = json!([{ "sender": "user", "text": "anyone?" }, { "text": "no author" }]);
        assert_eq!(latest_agent_reply(parse_message_history(&body)), None);
        assert!(parse_message_history(&json!({ "unexpected": 1 })).is_empty());
    }
}
