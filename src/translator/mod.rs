//!
//! Request translation from mixed OpenAI / Claude chat format to the canonical
//! backend request.
//!
//! Translation runs three passes over one request: tool declarations are
//! normalized, tool calls are correlated into a registry, then the
//! conversation is rewritten into backend turns. Nothing is kept between
//! requests, so one translator can be shared across handlers.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- modules --------------------------------------------------------------------------------- */

pub mod canonical;
pub mod declarations;
pub mod generation;
pub mod incoming;
pub mod registry;
pub mod rewriter;

/* --- uses ------------------------------------------------------------------------------------ */

use serde::{Deserialize, Serialize};

use crate::config::LogLevel;
use crate::error::{BridgeError, Result};

pub use canonical::{BackendRequest, CanonicalRequest, Part, THOUGHT_SIGNATURE, ToolGroup, Turn};
pub use incoming::IncomingRequest;
pub use registry::CallRegistry;
pub use rewriter::ConversationRewriter;

/* --- types ----------------------------------------------------------------------------------- */

///
/// What to do with a tool result whose call id was never registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationPolicy {
    /** emit the result with an empty tool name */
    #[default]
    Lenient,
    /** fail the whole request */
    Strict,
}

///
/// Translator settings, taken from the `[translator]` config section.
#[derive(Debug, Clone)]
pub struct TranslateOptions {
    /** logging level for trace output */
    pub log_level: LogLevel,
    /** correlation miss policy */
    pub correlation_policy: CorrelationPolicy,
    /** model used when neither the caller nor the body names one */
    pub default_model: Option<String>,
}

///
/// Stateless request translator.
#[derive(Debug, Clone, Default)]
pub struct RequestTranslator {
    options: TranslateOptions,
}

/* --- start of code -------------------------------------------------------------------------- */

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            correlation_policy: CorrelationPolicy::Lenient,
            default_model: None,
        }
    }
}

impl CorrelationPolicy {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lenient" => Ok(CorrelationPolicy::Lenient),
            "strict" => Ok(CorrelationPolicy::Strict),
            _ => Err(BridgeError::Config(format!(
                "Invalid correlation policy '{}'. Valid policies are: lenient, strict",
                s
            ))),
        }
    }
}

impl RequestTranslator {
    ///
    /// Create a new request translator.
    ///
    /// # Arguments
    ///  * `options` - translator settings
    ///
    /// # Returns
    ///  * New translator instance
    pub fn new(options: TranslateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TranslateOptions {
        &self.options
    }

    ///
    /// Translate raw request bytes into canonical backend request bytes.
    ///
    /// # Arguments
    ///  * `model` - target model id; empty to fall back to the body or the default model
    ///  * `body` - incoming request JSON
    ///  * `grounding` - append a `googleSearch` tool group; when `false`, `request.tools`
    ///    holds at most the single `functionDeclarations` group
    ///
    /// # Returns
    ///  * Serialized canonical request
    ///  * `BridgeError::MalformedRequest` if the body cannot be parsed or no model is known
    ///  * `BridgeError::UnresolvedToolCall` on a strict correlation miss
    pub fn translate(&self, model: &str, body: &[u8], grounding: bool) -> Result<Vec<u8>> {
        let request = IncomingRequest::from_slice(body)?;
        let canonical = self.translate_request(model, request, grounding)?;
        Ok(serde_json::to_vec(&canonical)?)
    }

    ///
    /// Translate a parsed request.
    ///
    /// # Arguments
    ///  * `model` - target model id; empty to fall back to the body or the default model
    ///  * `request` - parsed incoming request
    ///  * `grounding` - append a `googleSearch` tool group; when `false`, `request.tools`
    ///    holds at most the single `functionDeclarations` group
    ///
    /// # Returns
    ///  * Canonical request
    ///  * `BridgeError::MalformedRequest` if no model is known
    ///  * `BridgeError::UnresolvedToolCall` on a strict correlation miss
    pub fn translate_request(
        &self,
        model: &str,
        request: IncomingRequest,
        grounding: bool,
    ) -> Result<CanonicalRequest> {
        let model = self.resolve_model(model, &request)?;
        self.debug(&format!(
            "Translating {} message(s) for model {}",
            request.messages.len(),
            model
        ));

        let declarations = declarations::normalize_tool_definitions(request.tools.as_deref());

        let registry = CallRegistry::from_messages(&request.messages);
        self.debug(&format!("Registered {} tool call id(s)", registry.len()));

        let rewritten =
            ConversationRewriter::new(&registry, self.options.correlation_policy, self.options.log_level)
                .rewrite(&request.messages)?;

        let mut tools = Vec::new();
        if !declarations.is_empty() {
            tools.push(ToolGroup::Functions { function_declarations: declarations });
        }
        // opt-in extension; the default output keeps one declarations group or none
        if grounding {
            tools.push(ToolGroup::google_search());
        }

        let canonical = CanonicalRequest {
            model,
            request: BackendRequest {
                contents: rewritten.contents,
                system_instruction: rewritten.system_instruction,
                tools,
                generation_config: generation::generation_config(&request),
            },
        };

        self.debug(&format!(
            "Translated request with {} turn(s) and {} tool group(s)",
            canonical.request.contents.len(),
            canonical.request.tools.len()
        ));

        Ok(canonical)
    }

    /// Caller's model, then the body's, then the configured default
    fn resolve_model(&self, model: &str, request: &IncomingRequest) -> Result<String> {
        [Some(model), request.model.as_deref(), self.options.default_model.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|candidate| !candidate.is_empty())
            .map(str::to_string)
            .ok_or_else(|| BridgeError::MalformedRequest("no target model given".to_string()))
    }

    pub(crate) fn debug(&self, msg: &str) {
        if self.options.log_level.is_trace_enabled() {
            tracing::debug!("[TRACE] {}", msg);
        }
    }
}

///
/// Translate with default options.
///
/// # Arguments
///  * `model` - target model id
///  * `body` - incoming request JSON
///  * `grounding` - append a `googleSearch` tool group after the declarations
///
/// # Returns
///  * Serialized canonical request
///  * `BridgeError` on a malformed document
pub fn translate(model: &str, body: &[u8], grounding: bool) -> Result<Vec<u8>> {
    RequestTranslator::default().translate(model, body, grounding)
}

/* --- tests ----------------------------------------------------------------------------------- */
