use anyhow::{Result, bail};

use crate::openai::BoxedToolCall;

/// Fixed mapping from tool name to its schema and invocation
/// function. Built once when a chat session is constructed and shared
/// read-only for the session's lifetime.
#[derive(Default)]
pub struct ToolRegistry {
    entries: Vec<BoxedToolCall>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a tool. Names are unique within a registry.
    pub fn register(&mut self, tool: BoxedToolCall) -> Result<()> {
        let name = tool.function_name();
        if self.find(&name).is_some() {
            bail!("Tool '{}' is already registered", name);
        }
        self.entries.push(tool);
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&BoxedToolCall> {
        self.entries.iter().find(|t| t.function_name() == name)
    }

    /// The registered tools in registration order, serializable
    /// directly into a completion request's `tools` array.
    pub fn entries(&self) -> &[BoxedToolCall] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
