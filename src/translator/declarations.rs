//!
//! Tool-declaration normalizer.
//!
//! Accepts tool definitions in the OpenAI wrapped form
//! (`{"type":"function","function":{name, description, parameters}}`) and the
//! Claude flat form (`{name, description, input_schema}`), in any mix, and
//! produces backend function declarations in the same order. Schemas are
//! copied as-is; a definition without a usable schema is dropped.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use serde_json::Value;

use crate::translator::canonical::FunctionDeclaration;

/* --- types ----------------------------------------------------------------------------------- */

///
/// A tool definition that passed shape validation.
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingToolDef {
    /** OpenAI `{"type":"function","function":{...}}` */
    Wrapped(ToolSpec),
    /** Claude `{name, description, input_schema}` */
    Flat(ToolSpec),
}

///
/// Fields shared by both definition shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: Option<String>,
    /** `parameters` or `input_schema`, never null */
    pub schema: Value,
}

/* --- start of code -------------------------------------------------------------------------- */

impl TryFrom<&Value> for IncomingToolDef {
    type Error = String;

    ///
    /// Classify a raw definition by the presence of `function` or `input_schema`.
    ///
    /// # Returns
    ///  * The validated definition
    ///  * A short reason when the definition matches neither shape
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let object = value.as_object().ok_or("tool definition is not an object")?;

        if let Some(function) = object.get("function") {
            return ToolSpec::extract(function, "parameters").map(IncomingToolDef::Wrapped);
        }

        if object.contains_key("input_schema") {
            return ToolSpec::extract(value, "input_schema").map(IncomingToolDef::Flat);
        }

        Err("tool definition has neither `function` nor `input_schema`".to_string())
    }
}

impl ToolSpec {
    fn extract(source: &Value, schema_key: &str) -> Result<Self, String> {
        let name = source
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| "tool definition without a name".to_string())?;

        let schema = source
            .get(schema_key)
            .filter(|schema| !schema.is_null())
            .ok_or_else(|| format!("tool '{}' has no `{}`", name, schema_key))?;

        Ok(Self {
            name: name.to_string(),
            description: source.get("description").and_then(Value::as_str).map(str::to_string),
            schema: schema.clone(),
        })
    }
}

impl IncomingToolDef {
    fn spec(&self) -> &ToolSpec {
        match self {
            IncomingToolDef::Wrapped(spec) | IncomingToolDef::Flat(spec) => spec,
        }
    }
}

impl From<IncomingToolDef> for FunctionDeclaration {
    fn from(def: IncomingToolDef) -> Self {
        let spec = match def {
            IncomingToolDef::Wrapped(spec) | IncomingToolDef::Flat(spec) => spec,
        };
        FunctionDeclaration {
            name: spec.name,
            description: spec.description,
            parameters_json_schema: spec.schema,
        }
    }
}

///
/// Normalize raw tool definitions into function declarations.
///
/// Order is preserved; invalid definitions are skipped.
///
/// # Arguments
///  * `tools` - raw definitions, absent when the request declares no tools
///
/// # Returns
///  * Function declarations, possibly empty
pub fn normalize_tool_definitions(tools: Option<&[Value]>) -> Vec<FunctionDeclaration> {
    let Some(tools) = tools else {
        return Vec::new();
    };

    tools
        .iter()
        .filter_map(|raw| match IncomingToolDef::try_from(raw) {
            Ok(def) => {
                tracing::debug!("Declaring tool '{}'", def.spec().name);
                Some(FunctionDeclaration::from(def))
            }
            Err(reason) => {
                tracing::debug!("Dropping tool definition: {}", reason);
                None
            }
        })
        .collect()
}

/* --- tests ----------------------------------------------------------------------------------- */
