//! Enrichment — replaces each video/reading topic with a resolved URL.

use tracing::{info, warn};

use crate::resolver::{Resolution, ResourceResolver};
use crate::schema::{LearningPath, StepContent};

/// Resolves every unresolved video/reading step of `path`, in step order.
///
/// Never fails: a lookup that finds nothing leaves `StepContent::NotFound`.
/// Project steps and steps that are no longer topics are passed through.
pub async fn enrich(
    resolver: &dyn ResourceResolver,
    mut path: LearningPath,
    domain: &str,
) -> LearningPath {
    let mut resolved = 0;
    let mut missing = 0;

    for step in path.path.iter_mut() {
        let Some(kind) = step.kind.resource_kind() else {
            continue;
        };
        let StepContent::Topic(topic) = &step.content else {
            continue;
        };

        step.content = match resolver.resolve(topic, kind, domain).await {
            Resolution::Found(url) => {
                resolved += 1;
                StepContent::Resolved(url)
            }
            Resolution::Missing(reason) => {
                missing += 1;
                warn!("Step {} ('{}'): no resource ({:?})", step.step, step.title, reason);
                StepContent::NotFound
            }
        };
    }

    info!(
        "Enriched path for '{}': {} resolved, {} not found",
        domain, resolved, missing
    );
    path
}
