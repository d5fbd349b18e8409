//! Domain analysis — forecast, growth areas, and emerging roles for a career domain.

use tracing::info;

use crate::generation::prompts::{system_prompt, ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM};
use crate::generation::structured::{GenerationError, StructuredGenerator};
use crate::schema::DomainAnalysis;

/// Asks the model for a `DomainAnalysis` of `domain`.
///
/// An empty `emerging_roles` list is a valid answer; the pipeline decides what it means.
pub async fn analyze(
    generator: &StructuredGenerator,
    domain: &str,
) -> Result<DomainAnalysis, GenerationError> {
    let analysis: DomainAnalysis = generator
        .generate(
            &system_prompt(ANALYSIS_SYSTEM),
            ANALYSIS_PROMPT_TEMPLATE,
            &[("domain", domain)],
        )
        .await?;

    info!(
        "Analysis for '{}': {} growth areas, {} emerging roles",
        domain,
        analysis.growth_areas.len(),
        analysis.emerging_roles.len()
    );
    Ok(analysis)
}
