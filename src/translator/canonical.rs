//!
//! Canonical backend request model.
//!
//! Target format for every translated request: a `contents` list of user/model
//! turns made of parts, plus function declarations. Serialized field names
//! follow the backend's camelCase schema.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use serde::Serialize;
use serde_json::Value;

/* --- constants ------------------------------------------------------------------------------ */

/** Signature attached to every function call part; the backend rejects calls without one */
pub const THOUGHT_SIGNATURE: &str = "skip_thought_signature_validator";

/* --- types ----------------------------------------------------------------------------------- */

///
/// Top-level backend request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalRequest {
    /** target model identifier */
    pub model: String,
    /** the request payload proper */
    pub request: BackendRequest,
}

///
/// Request payload: conversation, tools and generation settings.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendRequest {
    /** conversation turns in order */
    pub contents: Vec<Turn>,
    /** system prompt collected from system/developer messages */
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Turn>,
    /** tool groups; omitted entirely when empty */
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolGroup>,
    /** sampling and thinking settings passed through from the client */
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

///
/// Conversation role on the backend side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

///
/// One conversational turn. Never holds zero parts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    role: TurnRole,
    parts: Vec<Part>,
}

///
/// One unit of turn content. Variants serialize without a tag; the field name
/// (`text`, `inlineData`, `functionCall`, `functionResponse`) identifies them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    FunctionCall {
        #[serde(rename = "functionCall")]
        function_call: FunctionCall,
        #[serde(rename = "thoughtSignature")]
        thought_signature: &'static str,
    },
    FunctionResponse {
        #[serde(rename = "functionResponse")]
        function_response: FunctionResponse,
    },
}

///
/// Base64 payload with its MIME type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

///
/// Function invocation made by the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    pub id: String,
    pub name: String,
    /** structured arguments, `{}` when the call takes none */
    pub args: Value,
}

///
/// Result of a function invocation, sent back as user content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionResponse {
    pub id: String,
    /** tool name recovered through the call registry; empty on a lenient miss */
    pub name: String,
    pub response: Value,
}

///
/// Entry of `request.tools`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolGroup {
    Functions {
        #[serde(rename = "functionDeclarations")]
        function_declarations: Vec<FunctionDeclaration>,
    },
    GoogleSearch {
        #[serde(rename = "googleSearch")]
        google_search: GoogleSearch,
    },
}

/// Backend web grounding tool; serializes as `{}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoogleSearch {}

///
/// Declaration of a callable tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDeclaration {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /** parameter schema, copied structurally unchanged */
    pub parameters_json_schema: Value,
}

///
/// Generation settings. Values are copied from the client untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
}

///
/// Thinking budget derived from the client's reasoning effort.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    /** token budget; -1 lets the backend decide, 0 disables thinking */
    pub thinking_budget: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_thoughts: Option<bool>,
}

/* --- start of code -------------------------------------------------------------------------- */

impl Turn {
    ///
    /// Build a turn, refusing an empty part list.
    ///
    /// # Arguments
    ///  * `role` - backend role
    ///  * `parts` - turn content
    ///
    /// # Returns
    ///  * `Some(Turn)` when `parts` is non-empty, `None` otherwise
    pub fn new(role: TurnRole, parts: Vec<Part>) -> Option<Self> {
        if parts.is_empty() { None } else { Some(Self { role, parts }) }
    }

    pub fn role(&self) -> TurnRole {
        self.role
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }
}

impl Part {
    /// Text part
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// Function call part carrying the fixed thought signature
    pub fn function_call(id: impl Into<String>, name: impl Into<String>, args: Value) -> Self {
        Part::FunctionCall {
            function_call: FunctionCall { id: id.into(), name: name.into(), args },
            thought_signature: THOUGHT_SIGNATURE,
        }
    }

    /// Function response part
    pub fn function_response(
        id: impl Into<String>,
        name: impl Into<String>,
        response: Value,
    ) -> Self {
        Part::FunctionResponse {
            function_response: FunctionResponse { id: id.into(), name: name.into(), response },
        }
    }
}

impl GenerationConfig {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == GenerationConfig::default()
    }
}

impl ToolGroup {
    /// Web grounding entry
    pub fn google_search() -> Self {
        ToolGroup::GoogleSearch { google_search: GoogleSearch::default() }
    }
}

/* --- tests ----------------------------------------------------------------------------------- */
