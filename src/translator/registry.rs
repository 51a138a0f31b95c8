//!
//! Call/result correlation.
//!
//! Tool results in both client formats carry only the call id. The registry is
//! built in a separate forward pass over the whole conversation so every
//! result can be resolved to the tool name recorded by its call.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use std::collections::HashMap;

use crate::translator::incoming::{ContentBlock, IncomingMessage, Role};

/* --- types ----------------------------------------------------------------------------------- */

///
/// Lookup from tool-call id to tool name for one request.
#[derive(Debug, Clone, Default)]
pub struct CallRegistry {
    names: HashMap<String, String>,
}

/* --- start of code -------------------------------------------------------------------------- */

impl CallRegistry {
    ///
    /// Register every tool call made by assistant messages.
    ///
    /// Both `tool_calls` entries and `tool_use` blocks are registered, also when
    /// they appear in the same message.
    ///
    /// # Arguments
    ///  * `messages` - the full conversation
    ///
    /// # Returns
    ///  * Registry covering the whole conversation
    pub fn from_messages(messages: &[IncomingMessage]) -> Self {
        let mut registry = Self::default();

        for msg in messages.iter().filter(|m| m.role() == Role::Assistant) {
            for call in &msg.tool_calls {
                registry.register(&call.id, &call.function.name);
            }
            for block in msg.blocks() {
                if let ContentBlock::ToolUse { id, name, .. } = block {
                    registry.register(id, name);
                }
            }
        }

        registry
    }

    /// Record `id -> name`; a reused id keeps the later name
    pub fn register(&mut self, id: &str, name: &str) {
        if let Some(previous) = self.names.insert(id.to_string(), name.to_string()) {
            tracing::debug!(
                "Tool call id '{}' registered twice ('{}' replaced by '{}')",
                id,
                previous,
                name
            );
        }
    }

    /// Tool name recorded for `id`
    pub fn lookup(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/* --- tests ----------------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::incoming::IncomingRequest;

    fn messages(body: &str) -> Vec<IncomingMessage> {
        IncomingRequest::from_slice(body.as_bytes()).expect("valid request").messages
    }

    #[test]
    fn test_registers_both_formats_in_one_message() {
        let msgs = messages(
            r#"{"messages":[{"role":"assistant",
                "content":[{"type":"tool_use","id":"block_1","name":"Read","input":{}}],
                "tool_calls":[{"id":"call_1","type":"function","function":{"name":"Shell","arguments":"{}"}}]
            }]}"#,
        );

        let registry = CallRegistry::from_messages(&msgs);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("block_1"), Some("Read"));
        assert_eq!(registry.lookup("call_1"), Some("Shell"));
    }

    #[test]
    fn test_ignores_non_assistant_messages() {
        let msgs = messages(
            r#"{"messages":[{"role":"user",
                "content":[{"type":"tool_use","id":"u1","name":"Sneaky","input":{}}]
            }]}"#,
        );

        assert!(CallRegistry::from_messages(&msgs).is_empty());
    }

    #[test]
    fn test_last_registration_wins() {
        let msgs = messages(
            r#"{"messages":[
                {"role":"assistant","content":[{"type":"tool_use","id":"dup","name":"First","input":{}}]},
                {"role":"assistant","content":[{"type":"tool_use","id":"dup","name":"Second","input":{}}]}
            ]}"#,
        );

        assert_eq!(CallRegistry::from_messages(&msgs).lookup("dup"), Some("Second"));
    }

    #[test]
    fn test_miss_returns_none() {
        assert_eq!(CallRegistry::default().lookup("nope"), None);
    }
}
