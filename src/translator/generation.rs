//!
//! Generation config pass-through.
//!
//! Sampling fields are renamed to the backend schema and copied without
//! touching their values. `reasoning_effort` is the only field that is mapped,
//! onto a thinking budget.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use crate::translator::canonical::{GenerationConfig, ThinkingConfig};
use crate::translator::incoming::IncomingRequest;

/* --- constants ------------------------------------------------------------------------------ */

/** Budget that lets the backend size the thinking itself */
const DYNAMIC_THINKING_BUDGET: i64 = -1;
const LOW_THINKING_BUDGET: i64 = 1024;
const MEDIUM_THINKING_BUDGET: i64 = 8192;
const HIGH_THINKING_BUDGET: i64 = 24576;

/* --- start of code -------------------------------------------------------------------------- */

///
/// Collect the generation settings of a request.
///
/// # Arguments
///  * `request` - parsed incoming request
///
/// # Returns
///  * Backend generation config, `None` when the client set nothing
pub fn generation_config(request: &IncomingRequest) -> Option<GenerationConfig> {
    let config = GenerationConfig {
        temperature: request.temperature.clone(),
        top_p: request.top_p.clone(),
        top_k: request.top_k.clone(),
        max_output_tokens: request
            .max_completion_tokens
            .clone()
            .or_else(|| request.max_tokens.clone()),
        candidate_count: request.n.clone(),
        stop_sequences: request.stop.as_ref().map(|stop| stop.to_vec()),
        thinking_config: request.reasoning_effort.as_deref().and_then(thinking_config),
    };

    if config.is_empty() { None } else { Some(config) }
}

///
/// Map an OpenAI reasoning effort onto a thinking config.
///
/// # Arguments
///  * `effort` - none, auto, low, medium or high (case-insensitive)
///
/// # Returns
///  * Thinking config, `None` for unknown values
pub fn thinking_config(effort: &str) -> Option<ThinkingConfig> {
    let budget = match effort.trim().to_lowercase().as_str() {
        "none" => {
            return Some(ThinkingConfig { thinking_budget: 0, include_thoughts: None });
        }
        "auto" => DYNAMIC_THINKING_BUDGET,
        "low" => LOW_THINKING_BUDGET,
        "medium" => MEDIUM_THINKING_BUDGET,
        "high" => HIGH_THINKING_BUDGET,
        other => {
            tracing::debug!("Ignoring unknown reasoning_effort '{}'", other);
            return None;
        }
    };

    Some(ThinkingConfig { thinking_budget: budget, include_thoughts: Some(true) })
}

/* --- tests ----------------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: serde_json::Value) -> IncomingRequest {
        IncomingRequest::from_slice(body.to_string().as_bytes()).expect("valid request")
    }

    #[test]
    fn test_nothing_set_is_none() {
        assert!(generation_config(&request(json!({"messages": []}))).is_none());
    }

    #[test]
    fn test_values_copied_verbatim() {
        let config = generation_config(&request(json!({
            "temperature": 0.25,
            "top_p": 0.9,
            "top_k": 40,
            "max_tokens": 100,
            "n": 2,
            "stop": "END"
        })))
        .unwrap();

        assert_eq!(
            serde_json::to_value(config).unwrap(),
            json!({
                "temperature": 0.25,
                "topP": 0.9,
                "topK": 40,
                "maxOutputTokens": 100,
                "candidateCount": 2,
                "stopSequences": ["END"]
            })
        );
    }

    #[test]
    fn test_max_completion_tokens_preferred() {
        let config =
            generation_config(&request(json!({"max_tokens": 10, "max_completion_tokens": 20})))
                .unwrap();
        assert_eq!(config.max_output_tokens, Some(json!(20)));
    }

    #[test]
    fn test_reasoning_effort_mapping() {
        assert_eq!(thinking_config("none").unwrap().thinking_budget, 0);
        assert_eq!(thinking_config("none").unwrap().include_thoughts, None);
        assert_eq!(thinking_config("auto").unwrap().thinking_budget, -1);
        assert_eq!(thinking_config("low").unwrap().thinking_budget, 1024);
        assert_eq!(thinking_config("Medium").unwrap().thinking_budget, 8192);
        assert_eq!(thinking_config("high").unwrap().include_thoughts, Some(true));
        assert!(thinking_config("extreme").is_none());
    }
}
