// All LLM prompt constants for the generation module.
// The JSON-only fragment comes from llm_client::prompts and is appended by `system_prompt`.

/// System prompt for domain analysis.
pub const ANALYSIS_SYSTEM: &str = "You are a futuristic career analyst. \
    You study how career domains will change over the next 5-10 years: \
    which areas will grow, which disruptions are coming, and which new job roles will emerge. \
    Be concrete and specific to the domain. \
    List the most important emerging role first.";

/// Domain analysis prompt template. Replace `{domain}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = "Analyze the career domain: '{domain}'.";

/// System prompt for learning path generation.
/// The style rule is the contract `build_path` checks after the call.
pub const LEARNING_PATH_SYSTEM: &str = "You are an expert curriculum developer. \
    Your task is to create a personalized, step-by-step learning path for the given skills, \
    strictly following the user's preferred learning style. \
    - If the learning_style is 'visual', you MUST generate a path containing ONLY steps with the type 'video'. \
    - If the learning_style is 'reading', you MUST generate a path containing ONLY steps with the type 'reading'. \
    - If the learning_style is 'practical', you MUST generate a path containing ONLY steps with the type 'project'. \
    Do not mix types. Number the steps from 1 in the order they should be taken.";

/// Learning path prompt template.
/// Replace: {domain}, {key_skills}, {learning_style}
pub const LEARNING_PATH_PROMPT_TEMPLATE: &str = "Create a learning path for the '{domain}' domain, \
    focusing on these skills: {key_skills}. \
    The user's preferred learning style is '{learning_style}'.";

/// Appended to the learning path prompt when a previous answer mixed step types.
/// Replace: {step_type}
pub const STYLE_REMINDER_TEMPLATE: &str = "Your previous answer contained steps of other types. \
    Every step MUST have \"type\": \"{step_type}\".";

/// Joins a role prompt with the shared JSON-only rules.
pub fn system_prompt(role: &str) -> String {
    format!("{role} {}", crate::llm_client::prompts::JSON_ONLY_SYSTEM)
}
