//! Career planning pipeline — analysis, learning path, enrichment.
//!
//! Flow: INIT → ANALYZED → NO_ROLES (terminal)
//!                       → PATH_GENERATED → ENRICHED (terminal)
//!
//! Every external call is awaited before the next one is issued; nothing here
//! runs concurrently. Schema failures end the run; resolution failures do not.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::generation::{self, GenerationError, StructuredGenerator, StyleAdherence};
use crate::llm_client::LanguageModel;
use crate::resolver::ResourceResolver;
use crate::schema::{DomainAnalysis, LearningPath, LearningStyle};

pub mod enrich;
pub mod handlers;
pub mod session;

pub use session::{AnalysisCache, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Init,
    Analyzed,
    NoRoles,
    PathGenerated,
    Enriched,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PipelineStage::Init => "INIT",
            PipelineStage::Analyzed => "ANALYZED",
            PipelineStage::NoRoles => "NO_ROLES",
            PipelineStage::PathGenerated => "PATH_GENERATED",
            PipelineStage::Enriched => "ENRICHED",
        })
    }
}

/// Terminal result of a successful run.
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// The analysis listed no emerging roles, so there is nothing to build a path for.
    NoRoles { analysis: DomainAnalysis },
    Enriched {
        analysis: DomainAnalysis,
        path: LearningPath,
        adherence: StyleAdherence,
    },
}

impl PipelineOutcome {
    /// Terminal stage the run ended in.
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineOutcome::NoRoles { .. } => PipelineStage::NoRoles,
            PipelineOutcome::Enriched { .. } => PipelineStage::Enriched,
        }
    }
}

#[derive(Clone)]
pub struct Pipeline {
    generator: StructuredGenerator,
    resolver: Arc<dyn ResourceResolver>,
}

impl Pipeline {
    pub fn new(model: Arc<dyn LanguageModel>, resolver: Arc<dyn ResourceResolver>) -> Self {
        Self {
            generator: StructuredGenerator::new(model),
            resolver,
        }
    }

    pub async fn analyze(&self, domain: &str) -> Result<DomainAnalysis, GenerationError> {
        generation::analyze(&self.generator, domain).await
    }

    /// Like `analyze`, but answers from `cache` when it holds this exact domain.
    /// Only successful analyses are stored.
    pub async fn analyze_cached(
        &self,
        domain: &str,
        cache: &mut AnalysisCache,
    ) -> Result<DomainAnalysis, GenerationError> {
        if let Some(analysis) = cache.get(domain) {
            info!("Reusing cached analysis for '{}'", domain);
            return Ok(analysis.clone());
        }
        let analysis = self.analyze(domain).await?;
        cache.store(domain, analysis.clone());
        Ok(analysis)
    }

    pub async fn build_path(
        &self,
        domain: &str,
        skills: &[String],
        style: LearningStyle,
    ) -> Result<(LearningPath, StyleAdherence), GenerationError> {
        generation::build_path(&self.generator, domain, skills, style).await
    }

    pub async fn enrich(&self, path: LearningPath, domain: &str) -> LearningPath {
        enrich::enrich(self.resolver.as_ref(), path, domain).await
    }

    /// Runs the whole pipeline for one request.
    pub async fn run(
        &self,
        domain: &str,
        style: LearningStyle,
        cache: &mut AnalysisCache,
    ) -> Result<PipelineOutcome, GenerationError> {
        info!("[{}] Planning '{}' ({})", PipelineStage::Init, domain, style);

        let analysis = self.analyze_cached(domain, cache).await?;
        info!(
            "[{}] {} emerging roles",
            PipelineStage::Analyzed,
            analysis.emerging_roles.len()
        );

        let Some(role) = analysis.primary_role() else {
            info!("[{}] Nothing to build a path for", PipelineStage::NoRoles);
            return Ok(PipelineOutcome::NoRoles { analysis });
        };
        let skills = role.required_skills.clone();
        info!(
            "Building path for role '{}' with skills {:?}",
            role.title, skills
        );

        let (path, adherence) = self.build_path(domain, &skills, style).await?;
        info!(
            "[{}] {} steps",
            PipelineStage::PathGenerated,
            path.path.len()
        );

        let path = self.enrich(path, domain).await;
        info!("[{}] Done", PipelineStage::Enriched);

        Ok(PipelineOutcome::Enriched {
            analysis,
            path,
            adherence,
        })
    }
}
