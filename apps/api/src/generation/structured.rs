//! Structured generation — one model call whose text must parse into a `ResponseSchema`.
//!
//! Flow: render user template → append format instructions → model call →
//!       strip fences → parse → `validate()`.
//!
//! Parse and validation failures surface as `GenerationError::SchemaValidation`.
//! Nothing here retries or coerces; that is the caller's policy.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::{strip_json_fences, LanguageModel, LlmError};
use crate::schema::{format_instructions, ResponseSchema};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{schema} response did not match the requested schema: {reason}")]
    SchemaValidation { schema: &'static str, reason: String },

    #[error("Prompt template error: {0}")]
    Template(String),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Fills `{name}` placeholders in `template` from `vars`.
///
/// Values are inserted verbatim and never re-scanned. A placeholder without a
/// value is an error; braces that do not wrap an identifier are left alone.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> Result<String, GenerationError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let placeholder = after
            .find('}')
            .map(|close| &after[..close])
            .filter(|name| is_placeholder_name(name));

        match placeholder {
            Some(name) => {
                let value = vars
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| *value)
                    .ok_or_else(|| {
                        GenerationError::Template(format!("no value for placeholder '{{{name}}}'"))
                    })?;
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_lowercase() || c == '_')
}

/// Wraps a `LanguageModel` with schema-constrained output.
#[derive(Clone)]
pub struct StructuredGenerator {
    model: Arc<dyn LanguageModel>,
}

impl StructuredGenerator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Asks the model for a `T` and parses the answer. Exactly one model call.
    pub async fn generate<T: ResponseSchema>(
        &self,
        system: &str,
        template: &str,
        vars: &[(&str, &str)],
    ) -> Result<T, GenerationError> {
        let user_prompt = render_template(template, vars)?;
        let prompt = format!("{user_prompt}\n\n{}", format_instructions::<T>());

        let raw = self.model.complete(system, &prompt).await?;
        debug!("{} response: {} chars", T::NAME, raw.len());

        parse_response::<T>(&raw)
    }
}

/// Parses raw model text into `T`, enforcing both serde and `validate()`.
pub fn parse_response<T: ResponseSchema>(raw: &str) -> Result<T, GenerationError> {
    let text = strip_json_fences(raw);

    let value: T = serde_json::from_str(text).map_err(|e| {
        warn!("{} parse failed: {e}", T::NAME);
        GenerationError::SchemaValidation {
            schema: T::NAME,
            reason: e.to_string(),
        }
    })?;

    value
        .validate()
        .map_err(|reason| GenerationError::SchemaValidation {
            schema: T::NAME,
            reason,
        })?;

    Ok(value)
}
