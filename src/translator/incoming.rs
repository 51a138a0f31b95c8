//!
//! Incoming request model for the mixed OpenAI / Claude chat format.
//!
//! Clients send OpenAI chat-completion requests, Claude-style content blocks,
//! or a mix of both inside one conversation. Only a body that is not a JSON
//! object is rejected. Messages, blocks and tool calls are parsed element by
//! element so one malformed element is dropped without failing the whole
//! document, and fields of the wrong JSON type count as absent.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{BridgeError, Result};

/* --- types ----------------------------------------------------------------------------------- */

///
/// Chat request as received from the client.
///
/// Sampling fields are kept as raw JSON values so they can be handed to the
/// backend unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct IncomingRequest {
    /** model named by the client, used only when the caller gives none */
    #[serde(default, deserialize_with = "lenient_string")]
    pub model: Option<String>,
    /** conversation messages in document order */
    #[serde(default, deserialize_with = "message_list")]
    pub messages: Vec<IncomingMessage>,
    /** raw tool definitions, validated one by one by the normalizer */
    #[serde(default, deserialize_with = "tool_list")]
    pub tools: Option<Vec<Value>>,
    /** sampling temperature */
    #[serde(default)]
    pub temperature: Option<Value>,
    /** nucleus sampling threshold */
    #[serde(default)]
    pub top_p: Option<Value>,
    /** top-k sampling */
    #[serde(default)]
    pub top_k: Option<Value>,
    /** legacy output token limit */
    #[serde(default)]
    pub max_tokens: Option<Value>,
    /** output token limit, preferred over `max_tokens` */
    #[serde(default)]
    pub max_completion_tokens: Option<Value>,
    /** number of candidates */
    #[serde(default)]
    pub n: Option<Value>,
    /** stop sequence or sequences */
    #[serde(default, deserialize_with = "lenient_stop")]
    pub stop: Option<StopSequences>,
    /** OpenAI reasoning effort: none, auto, low, medium, high */
    #[serde(default, deserialize_with = "lenient_string")]
    pub reasoning_effort: Option<String>,
}

///
/// A single message of the conversation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomingMessage {
    /** message role as sent on the wire, empty when it is not a string */
    #[serde(default, deserialize_with = "role_string")]
    pub role: String,
    /** plain text or block content */
    #[serde(default, deserialize_with = "message_content")]
    pub content: Option<MessageContent>,
    /** OpenAI-style tool invocations on assistant messages */
    #[serde(default, deserialize_with = "lenient_list")]
    pub tool_calls: Vec<ToolCall>,
    /** call id answered by a `tool` role message; numeric ids are kept as text */
    #[serde(default, deserialize_with = "lenient_string")]
    pub tool_call_id: Option<String>,
}

///
/// Known message roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    Developer,
    User,
    Assistant,
    Tool,
    Unknown,
}

///
/// Message content: either a plain string or an ordered list of blocks.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    /** simple string content */
    Text(String),
    /** structured content blocks */
    Blocks(Vec<ContentBlock>),
}

///
/// Structured content block, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /** text content */
    Text {
        #[serde(default)]
        text: String,
    },
    /** Claude-style tool invocation */
    ToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: Value,
    },
    /** Claude-style tool result; `content` is a string, a block list, or anything else */
    ToolResult {
        tool_use_id: String,
        #[serde(default)]
        content: Value,
    },
    /** OpenAI image reference */
    ImageUrl { image_url: ImageUrl },
    /** Claude image with inline source */
    Image { source: ImageSource },
    /** any block type this translator does not handle */
    #[serde(other)]
    Unsupported,
}

///
/// OpenAI image URL reference.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

///
/// Claude image source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageSource {
    /** source kind, only `base64` carries inline data */
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

///
/// OpenAI tool call made by the assistant.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolCall {
    /** unique identifier for this tool call */
    pub id: String,
    /** function call details */
    pub function: ToolCallFunction,
}

///
/// Function name and arguments of an OpenAI tool call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolCallFunction {
    pub name: String,
    /** usually a JSON-encoded string, occasionally an already structured object */
    #[serde(default)]
    pub arguments: Value,
}

///
/// `stop` accepts a single string or a list.
#[derive(Debug, Clone, PartialEq)]
pub enum StopSequences {
    One(String),
    Many(Vec<String>),
}

/* --- start of code -------------------------------------------------------------------------- */

impl IncomingRequest {
    ///
    /// Parse a raw request body.
    ///
    /// # Arguments
    ///  * `body` - request bytes
    ///
    /// # Returns
    ///  * Parsed request
    ///  * `BridgeError::MalformedRequest` if the body is not JSON or not an object
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            BridgeError::MalformedRequest(format!("request body is not valid JSON: {}", e))
        })?;

        if !value.is_object() {
            return Err(BridgeError::MalformedRequest(
                "request body must be a JSON object".to_string(),
            ));
        }

        serde_json::from_value(value).map_err(|e| {
            BridgeError::MalformedRequest(format!("unexpected request shape: {}", e))
        })
    }
}

impl IncomingMessage {
    /// Role of this message
    pub fn role(&self) -> Role {
        Role::from(self.role.as_str())
    }

    /// Content blocks, empty for plain or absent content
    pub fn blocks(&self) -> &[ContentBlock] {
        match &self.content {
            Some(MessageContent::Blocks(blocks)) => blocks,
            _ => &[],
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            "system" => Role::System,
            "developer" => Role::Developer,
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "tool" => Role::Tool,
            _ => Role::Unknown,
        }
    }
}

impl StopSequences {
    /// Flatten into a list
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            StopSequences::One(s) => vec![s.clone()],
            StopSequences::Many(list) => list.clone(),
        }
    }
}

/* --- serde helpers --------------------------------------------------------------------------- */

/// Items of a list field; `null` and non-list values yield no items
fn list_items(value: Value, field: &str) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            tracing::warn!("Ignoring `{}` that is not a list: {}", field, other);
            Vec::new()
        }
    }
}

/// Messages in order; an element that is not a message is skipped
fn message_list<'de, D>(deserializer: D) -> std::result::Result<Vec<IncomingMessage>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = list_items(Value::deserialize(deserializer)?, "messages");

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<IncomingMessage>(value) {
            Ok(msg) => Some(msg),
            Err(e) => {
                tracing::warn!("Skipping malformed message {}: {}", index, e);
                None
            }
        })
        .collect())
}

/// Deserialize a list element by element, dropping elements that fail to parse
fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(parse_elements(list_items(Value::deserialize(deserializer)?, "tool_calls")))
}

/// Raw tool definitions; anything but a list counts as no tools
fn tool_list<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    let tools = match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items),
        Value::Null => None,
        other => {
            tracing::debug!("Ignoring `tools` that is not a list: {}", other);
            None
        }
    };
    Ok(tools)
}

/// Strings pass through, numbers become their text, anything else is absent
fn scalar_string(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Null => None,
        other => {
            tracing::debug!("Ignoring non-scalar value where text was expected: {}", other);
            None
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_string(Value::deserialize(deserializer)?))
}

/// Role text; a role that is not a string becomes empty and maps to `Role::Unknown`
fn role_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let role = match Value::deserialize(deserializer)? {
        Value::String(role) => role,
        other => {
            tracing::debug!("Ignoring message role that is not a string: {}", other);
            String::new()
        }
    };
    Ok(role)
}

/// `stop` as one string or a list of strings; other shapes and empty lists are absent
fn lenient_stop<'de, D>(deserializer: D) -> std::result::Result<Option<StopSequences>, D::Error>
where
    D: Deserializer<'de>,
{
    let stop = match Value::deserialize(deserializer)? {
        Value::String(text) => Some(StopSequences::One(text)),
        Value::Array(items) => {
            let sequences: Vec<String> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text),
                    _ => None,
                })
                .collect();
            (!sequences.is_empty()).then_some(StopSequences::Many(sequences))
        }
        Value::Null => None,
        other => {
            tracing::debug!("Ignoring `stop` of unexpected type: {}", other);
            None
        }
    };
    Ok(stop)
}

fn parse_elements<T: DeserializeOwned>(raw: Vec<Value>) -> Vec<T> {
    raw.into_iter()
        .filter_map(|value| match serde_json::from_value::<T>(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::debug!("Dropping malformed element: {}", e);
                None
            }
        })
        .collect()
}

/// Content is a string, a block list, or a single block object; anything else counts as absent
fn message_content<'de, D>(deserializer: D) -> std::result::Result<Option<MessageContent>, D::Error>
where
    D: Deserializer<'de>,
{
    let content = match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(MessageContent::Text(text)),
        Value::Array(items) => Some(MessageContent::Blocks(parse_elements(items))),
        object @ Value::Object(_) => Some(MessageContent::Blocks(parse_elements(vec![object]))),
        other => {
            tracing::debug!("Ignoring message content of unexpected type: {}", other);
            None
        }
    };
    Ok(content)
}

/* --- tests ----------------------------------------------------------------------------------- */
