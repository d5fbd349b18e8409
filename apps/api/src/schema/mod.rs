//! Response schemas — the shapes the model is asked to produce.
//!
//! Field descriptions are part of the prompt contract: `format_instructions`
//! serialises them into the block appended to every structured prompt.

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::llm_client::prompts::FORMAT_INSTRUCTIONS_TEMPLATE;

pub mod analysis;
pub mod path;

pub use analysis::DomainAnalysis;
pub use path::{LearningPath, LearningStep, LearningStyle, ResourceKind, StepContent, StepType};

/// A type the model can be asked to emit as JSON.
pub trait ResponseSchema: DeserializeOwned {
    /// Schema title shown to the model and used in error messages.
    const NAME: &'static str;

    /// JSON-schema-like description of the type, including field descriptions.
    fn shape() -> Value;

    /// Constraints serde cannot express. Runs after a successful parse.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Renders the instruction block that tells the model which shape to return.
pub fn format_instructions<T: ResponseSchema>() -> String {
    let schema = serde_json::to_string_pretty(&T::shape()).unwrap_or_else(|_| T::NAME.to_string());
    FORMAT_INSTRUCTIONS_TEMPLATE.replace("{schema}", &schema)
}

// ────────────────────────────────────────────────────────────────────────────
// Shape builders
// ────────────────────────────────────────────────────────────────────────────

/// Object node. Every listed property is required.
pub(crate) fn object(title: &str, properties: &[(&str, Value)]) -> Value {
    let mut props = Map::new();
    for (name, node) in properties {
        props.insert((*name).to_string(), node.clone());
    }
    let required: Vec<&str> = properties.iter().map(|(name, _)| *name).collect();
    json!({
        "title": title,
        "type": "object",
        "properties": props,
        "required": required,
    })
}

pub(crate) fn string(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

pub(crate) fn integer(description: &str, minimum: i64) -> Value {
    json!({ "type": "integer", "minimum": minimum, "description": description })
}

pub(crate) fn string_enum(description: &str, members: &[&str]) -> Value {
    json!({ "type": "string", "enum": members, "description": description })
}

pub(crate) fn array(description: &str, items: Value) -> Value {
    json!({ "type": "array", "items": items, "description": description })
}
