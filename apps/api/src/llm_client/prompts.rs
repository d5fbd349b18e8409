// Shared prompt fragments.
// Each use of the model defines its own prompts alongside it (see generation::prompts).

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Header of the format-instruction block appended to every structured prompt.
/// Replace `{schema}` with the pretty-printed response shape.
pub const FORMAT_INSTRUCTIONS_TEMPLATE: &str = r#"The output must be a single JSON object that conforms to the schema below.
Every property marked as required must be present. Use exactly the listed enum values where a property declares them.
Each "description" explains what the property must contain.

Here is the output schema:
{schema}"#;
