//! Learning path generation constrained to a single step type.
//!
//! The style rule lives in the prompt, so it is checked here after the call:
//! one regeneration with a reminder, then non-conforming steps are dropped.

use serde::Serialize;
use tracing::{info, warn};

use crate::generation::prompts::{
    system_prompt, LEARNING_PATH_PROMPT_TEMPLATE, LEARNING_PATH_SYSTEM, STYLE_REMINDER_TEMPLATE,
};
use crate::generation::structured::{GenerationError, StructuredGenerator};
use crate::schema::{LearningPath, LearningStyle, ResponseSchema, StepType};

/// Extra calls allowed when the model mixes step types.
pub const MAX_STYLE_REGENERATIONS: u32 = 1;

/// How well the accepted generation followed the requested style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleAdherence {
    /// Share of steps with the wrong type, 0.0 – 1.0.
    pub violation_rate: f32,
    pub requested: LearningStyle,
    pub step_type: StepType,
    /// Steps in the accepted generation, before filtering.
    pub total_steps: usize,
    pub conforming_steps: usize,
    pub regenerations: u32,
    pub filtered_steps: usize,
}

fn violation_rate(total_steps: usize, conforming_steps: usize) -> f32 {
    if total_steps == 0 {
        return 0.0;
    }
    (total_steps - conforming_steps) as f32 / total_steps as f32
}

/// Generates a learning path over `skills` where every step has the style's type.
pub async fn build_path(
    generator: &StructuredGenerator,
    domain: &str,
    skills: &[String],
    style: LearningStyle,
) -> Result<(LearningPath, StyleAdherence), GenerationError> {
    let system = system_prompt(LEARNING_PATH_SYSTEM);
    let key_skills = skills.join(", ");
    let step_type = style.step_type();
    let vars = [
        ("domain", domain),
        ("key_skills", key_skills.as_str()),
        ("learning_style", style.as_str()),
        ("step_type", step_type.as_str()),
    ];

    let mut template = LEARNING_PATH_PROMPT_TEMPLATE.to_string();
    let mut regenerations = 0;

    loop {
        let mut path: LearningPath = generator.generate(&system, &template, &vars).await?;
        let total_steps = path.path.len();
        let conforming_steps = path.conforming_steps(style);

        let mut adherence = StyleAdherence {
            violation_rate: violation_rate(total_steps, conforming_steps),
            requested: style,
            step_type,
            total_steps,
            conforming_steps,
            regenerations,
            filtered_steps: 0,
        };

        if conforming_steps == total_steps {
            info!(
                "Learning path for '{}' ({}): {} steps",
                domain, style, total_steps
            );
            path.renumber();
            return Ok((path, adherence));
        }

        warn!(
            "Learning path attempt {}/{}: {}/{} steps are not '{}'",
            regenerations + 1,
            MAX_STYLE_REGENERATIONS + 1,
            total_steps - conforming_steps,
            total_steps,
            step_type
        );

        if regenerations < MAX_STYLE_REGENERATIONS {
            regenerations += 1;
            template = format!("{LEARNING_PATH_PROMPT_TEMPLATE} {STYLE_REMINDER_TEMPLATE}");
            continue;
        }

        if conforming_steps == 0 {
            return Err(GenerationError::SchemaValidation {
                schema: LearningPath::NAME,
                reason: format!("no step has the requested type '{step_type}'"),
            });
        }

        path.retain_style(style);
        adherence.filtered_steps = total_steps - conforming_steps;
        return Ok((path, adherence));
    }
}
