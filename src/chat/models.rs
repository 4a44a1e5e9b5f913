//! The core models for the UI-visible side of a chat session.
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq)]
pub enum ChatRole {
    User,
    Assistant,
    /// Progress entry for a tool the model asked to run. Display
    /// only; never replayed to the remote endpoint verbatim.
    ToolResult,
}

/// One displayable entry in the transcript. Every message carries a
/// role, non-empty content, and a creation timestamp; tool metadata
/// is present only on tool-result entries.
#[derive(Clone, Debug)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub tool_name: Option<String>,
    pub tool_args: Option<Value>,
}

impl ChatMessage {
    pub fn new_user(content: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: ChatRole::User,
            content: content.to_string(),
            timestamp: Utc::now(),
            tool_name: None,
            tool_args: None,
        }
    }

    pub fn new_assistant(content: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: ChatRole::Assistant,
            content: content.to_string(),
            timestamp: Utc::now(),
            tool_name: None,
            tool_args: None,
        }
    }

    pub fn new_tool_result(content: &str, tool_name: &str, tool_args: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: ChatRole::ToolResult,
            content: content.to_string(),
            timestamp: Utc::now(),
            tool_name: Some(tool_name.to_string()),
            tool_args: Some(tool_args),
        }
    }
}

/// Ordered, append-only sequence of messages for one session. Cleared
/// in full on explicit reset; no partial deletion.
#[derive(Default)]
pub struct Transcript(Vec<ChatMessage>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.0
    }

    pub fn push(&mut self, msg: ChatMessage) {
        self.0.push(msg)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear()
    }
}
