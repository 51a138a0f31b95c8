//!
//! Conversation rewriter.
//!
//! Walks the incoming messages in order and produces backend turns. Assistant
//! messages become `model` turns, user and tool messages become `user` turns,
//! system and developer messages are collected into the system instruction.
//! Tool results are named through the call registry built beforehand.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use serde_json::{Value, json};

use crate::config::LogLevel;
use crate::error::{BridgeError, Result};
use crate::translator::CorrelationPolicy;
use crate::translator::canonical::{InlineData, Part, Turn, TurnRole};
use crate::translator::incoming::{
    ContentBlock, ImageSource, IncomingMessage, MessageContent, Role, ToolCall,
};
use crate::translator::registry::CallRegistry;

/* --- constants ------------------------------------------------------------------------------ */

/** Separator between collected system prompts */
const SYSTEM_SEPARATOR: &str = "\n\n";

/* --- types ----------------------------------------------------------------------------------- */

///
/// Output of one rewrite pass.
#[derive(Debug, Clone, Default)]
pub struct Rewritten {
    /** backend turns, none of them empty */
    pub contents: Vec<Turn>,
    /** joined system/developer text, absent when there is none */
    pub system_instruction: Option<Turn>,
}

///
/// Rewrites one conversation against a prepared call registry.
pub struct ConversationRewriter<'a> {
    /** id to tool name lookup for tool results */
    registry: &'a CallRegistry,
    /** behaviour when a result id is not in the registry */
    policy: CorrelationPolicy,
    /** logging level for trace output */
    log_level: LogLevel,
}

/* --- start of code -------------------------------------------------------------------------- */

impl<'a> ConversationRewriter<'a> {
    ///
    /// Create a rewriter.
    ///
    /// # Arguments
    ///  * `registry` - call registry built from the same messages
    ///  * `policy` - correlation miss policy
    ///  * `log_level` - logging level for trace output
    ///
    /// # Returns
    ///  * New rewriter instance
    pub fn new(registry: &'a CallRegistry, policy: CorrelationPolicy, log_level: LogLevel) -> Self {
        Self { registry, policy, log_level }
    }

    ///
    /// Rewrite all messages into backend turns.
    ///
    /// # Arguments
    ///  * `messages` - incoming conversation in document order
    ///
    /// # Returns
    ///  * Turns plus the collected system instruction
    ///  * `BridgeError::UnresolvedToolCall` on a correlation miss under the strict policy
    pub fn rewrite(&self, messages: &[IncomingMessage]) -> Result<Rewritten> {
        let mut contents = Vec::with_capacity(messages.len());
        let mut system_texts = Vec::new();

        for (index, msg) in messages.iter().enumerate() {
            self.debug(&format!("Rewriting message {} with role: {}", index, msg.role));

            let turn = match msg.role() {
                Role::System | Role::Developer => {
                    system_texts.extend(message_text(msg));
                    None
                }
                Role::User => Turn::new(TurnRole::User, self.user_parts(msg)?),
                Role::Assistant => Turn::new(TurnRole::Model, self.assistant_parts(msg)),
                Role::Tool => self.tool_turn(index, msg)?,
                Role::Unknown => {
                    tracing::warn!("Skipping message {} with unknown role '{}'", index, msg.role);
                    None
                }
            };

            match turn {
                Some(turn) => contents.push(turn),
                None => self.debug(&format!("Message {} produced no turn", index)),
            }
        }

        let system_instruction = if system_texts.is_empty() {
            None
        } else {
            Turn::new(TurnRole::User, vec![Part::text(system_texts.join(SYSTEM_SEPARATOR))])
        };

        Ok(Rewritten { contents, system_instruction })
    }

    ///
    /// Parts of a user message.
    ///
    /// # Arguments
    ///  * `msg` - user message
    ///
    /// # Returns
    ///  * Text, inline image and function response parts in block order
    ///  * `BridgeError::UnresolvedToolCall` on a strict correlation miss
    fn user_parts(&self, msg: &IncomingMessage) -> Result<Vec<Part>> {
        let blocks = match &msg.content {
            Some(MessageContent::Text(text)) => return Ok(text_part(text).into_iter().collect()),
            Some(MessageContent::Blocks(blocks)) => blocks,
            None => return Ok(Vec::new()),
        };

        let mut parts = Vec::with_capacity(blocks.len());
        for block in blocks {
            match block {
                ContentBlock::Text { text } => parts.extend(text_part(text)),
                ContentBlock::ToolResult { tool_use_id, content } => {
                    let name = self.resolve_name(tool_use_id)?;
                    let result = tool_result_text(content);
                    parts.push(Part::function_response(
                        tool_use_id,
                        name,
                        json!({ "result": result }),
                    ));
                }
                ContentBlock::ImageUrl { image_url } => parts.extend(data_url_part(&image_url.url)),
                ContentBlock::Image { source } => parts.extend(image_source_part(source)),
                ContentBlock::ToolUse { id, .. } => {
                    tracing::debug!("Ignoring tool_use block '{}' in a user message", id);
                }
                ContentBlock::Unsupported => {}
            }
        }
        Ok(parts)
    }

    ///
    /// Parts of an assistant message.
    ///
    /// Block parts come first, `tool_calls` entries are appended after them.
    ///
    /// # Arguments
    ///  * `msg` - assistant message
    ///
    /// # Returns
    ///  * Text and function call parts
    fn assistant_parts(&self, msg: &IncomingMessage) -> Vec<Part> {
        let mut parts = Vec::new();

        match &msg.content {
            Some(MessageContent::Text(text)) => parts.extend(text_part(text)),
            Some(MessageContent::Blocks(blocks)) => {
                for block in blocks {
                    match block {
                        ContentBlock::Text { text } => parts.extend(text_part(text)),
                        ContentBlock::ToolUse { id, name, input } => {
                            parts.push(Part::function_call(id, name, object_or_empty(input)));
                        }
                        _ => {}
                    }
                }
            }
            None => {}
        }

        parts.extend(msg.tool_calls.iter().map(|call| self.tool_call_part(call)));
        parts
    }

    fn tool_call_part(&self, call: &ToolCall) -> Part {
        let args = decode_arguments(&call.function.arguments);
        self.debug(&format!("Tool call {} -> {} with args {}", call.id, call.function.name, args));
        Part::function_call(&call.id, &call.function.name, args)
    }

    ///
    /// Turn for an OpenAI `tool` role message.
    ///
    /// # Arguments
    ///  * `index` - message position, for logging
    ///  * `msg` - tool message
    ///
    /// # Returns
    ///  * One user turn holding a function response, `None` without a call id
    ///  * `BridgeError::UnresolvedToolCall` on a strict correlation miss
    fn tool_turn(&self, index: usize, msg: &IncomingMessage) -> Result<Option<Turn>> {
        let Some(call_id) = msg.tool_call_id.as_deref() else {
            tracing::warn!("Skipping tool message {} without tool_call_id", index);
            return Ok(None);
        };

        let name = self.resolve_name(call_id)?;
        let text = message_text(msg).collect::<String>();
        let response = json!({ "result": embed_result(text) });

        Ok(Turn::new(TurnRole::User, vec![Part::function_response(call_id, name, response)]))
    }

    ///
    /// Look up the tool name for a result id.
    ///
    /// # Arguments
    ///  * `call_id` - id carried by the result
    ///
    /// # Returns
    ///  * Registered name, or an empty name on a lenient miss
    ///  * `BridgeError::UnresolvedToolCall` on a strict miss
    fn resolve_name(&self, call_id: &str) -> Result<String> {
        if let Some(name) = self.registry.lookup(call_id) {
            return Ok(name.to_string());
        }

        match self.policy {
            CorrelationPolicy::Strict => Err(BridgeError::UnresolvedToolCall(call_id.to_string())),
            CorrelationPolicy::Lenient => {
                tracing::warn!("No tool call registered for result '{}', sending empty name", call_id);
                Ok(String::new())
            }
        }
    }

    fn debug(&self, msg: &str) {
        if self.log_level.is_trace_enabled() {
            tracing::debug!("[TRACE] {}", msg);
        }
    }
}

/* --- helpers --------------------------------------------------------------------------------- */

/// Text part, skipped for empty text
fn text_part(text: &str) -> Option<Part> {
    (!text.is_empty()).then(|| Part::text(text))
}

/// Non-empty text pieces of a message: the string content or its text blocks
fn message_text(msg: &IncomingMessage) -> Box<dyn Iterator<Item = String> + '_> {
    match &msg.content {
        Some(MessageContent::Text(text)) if !text.is_empty() => {
            Box::new(std::iter::once(text.clone()))
        }
        Some(MessageContent::Blocks(blocks)) => Box::new(blocks.iter().filter_map(|block| {
            match block {
                ContentBlock::Text { text } if !text.is_empty() => Some(text.clone()),
                _ => None,
            }
        })),
        _ => Box::new(std::iter::empty()),
    }
}

///
/// Flatten `tool_result` content to one string.
///
/// # Arguments
///  * `content` - string, list of blocks, or anything else
///
/// # Returns
///  * The string as-is, the concatenated `text` sub-blocks, or an empty string
fn tool_result_text(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        Value::Array(blocks) => blocks
            .iter()
            .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|block| block.get("text").and_then(Value::as_str))
            .collect(),
        _ => String::new(),
    }
}

/// Tool message content: embedded as JSON when it is an object or array, else as text
fn embed_result(text: String) -> Value {
    match serde_json::from_str::<Value>(&text) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => value,
        _ => Value::String(text),
    }
}

///
/// Decode OpenAI call arguments into an object.
///
/// # Arguments
///  * `arguments` - JSON-encoded string or already structured value
///
/// # Returns
///  * Decoded object, `{}` when decoding fails or yields a non-object
fn decode_arguments(arguments: &Value) -> Value {
    match arguments {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(value @ Value::Object(_)) => value,
            _ => {
                if !raw.trim().is_empty() {
                    tracing::debug!("Tool call arguments are not a JSON object, using {{}}");
                }
                json!({})
            }
        },
        other => object_or_empty(other),
    }
}

/// Objects pass through, everything else becomes `{}`
fn object_or_empty(value: &Value) -> Value {
    if value.is_object() { value.clone() } else { json!({}) }
}

///
/// Inline data part from a `data:<mime>;base64,<payload>` URL.
///
/// # Arguments
///  * `url` - image URL
///
/// # Returns
///  * Inline data part, `None` for remote or unparseable URLs
fn data_url_part(url: &str) -> Option<Part> {
    let parsed = url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .and_then(|(header, data)| Some((header.strip_suffix(";base64")?, data)))
        .filter(|(mime_type, data)| !mime_type.is_empty() && !data.is_empty());

    match parsed {
        Some((mime_type, data)) => Some(Part::InlineData {
            inline_data: InlineData { mime_type: mime_type.to_string(), data: data.to_string() },
        }),
        None => {
            tracing::debug!("Dropping image that is not an inline base64 data URL");
            None
        }
    }
}

/// Inline data part from a Claude base64 image source
fn image_source_part(source: &ImageSource) -> Option<Part> {
    match (source.source_type.as_str(), &source.media_type, &source.data) {
        ("base64", Some(mime_type), Some(data)) if !data.is_empty() => Some(Part::InlineData {
            inline_data: InlineData { mime_type: mime_type.clone(), data: data.clone() },
        }),
        (kind, _, _) => {
            tracing::debug!("Dropping image with unsupported source '{}'", kind);
            None
        }
    }
}

/* --- tests ----------------------------------------------------------------------------------- */
