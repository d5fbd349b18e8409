//! Axum route handlers for the planning API.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::StyleAdherence;
use crate::pipeline::PipelineOutcome;
use crate::schema::{DomainAnalysis, LearningPath, LearningStyle};
use crate::state::AppState;

/// Shown when the analysis names no roles to learn towards.
pub const NO_ROLES_MESSAGE: &str =
    "No emerging roles were identified for this domain. Cannot generate a learning path.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub domain: String,
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub session_id: Uuid,
    pub analysis: DomainAnalysis,
    /// When this analysis was generated; older than the request on a cache hit.
    pub generated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct LearningPathRequest {
    pub domain: String,
    pub skills: Vec<String>,
    pub style: LearningStyle,
}

#[derive(Debug, Serialize)]
pub struct LearningPathResponse {
    pub path: LearningPath,
    pub adherence: StyleAdherence,
}

#[derive(Debug, Deserialize)]
pub struct EnrichRequest {
    pub domain: String,
    pub path: LearningPath,
}

#[derive(Debug, Serialize)]
pub struct EnrichResponse {
    pub path: LearningPath,
}

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub domain: String,
    pub style: LearningStyle,
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Enriched,
    NoRoles,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub session_id: Uuid,
    pub status: PlanStatus,
    pub analysis: DomainAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<LearningPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adherence: Option<StyleAdherence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn require_domain(domain: &str) -> Result<&str, AppError> {
    let domain = domain.trim();
    if domain.is_empty() {
        return Err(AppError::Validation("domain cannot be empty".to_string()));
    }
    Ok(domain)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analysis
///
/// Analyses a domain, reusing the session's cached analysis for the same domain.
pub async fn handle_analysis(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let domain = require_domain(&request.domain)?;
    let session_id = request.session_id.unwrap_or_else(Uuid::new_v4);

    let mut cache = state.sessions.checkout(session_id).await;
    let analysis = state.pipeline.analyze_cached(domain, &mut cache).await?;
    let generated_at = cache.cached_at();
    state.sessions.save(session_id, cache).await;

    Ok(Json(AnalysisResponse {
        session_id,
        analysis,
        generated_at,
    }))
}

/// POST /api/v1/learning-path
///
/// Generates an unresolved learning path for explicit skills.
pub async fn handle_learning_path(
    State(state): State<AppState>,
    Json(request): Json<LearningPathRequest>,
) -> Result<Json<LearningPathResponse>, AppError> {
    let domain = require_domain(&request.domain)?;
    if request.skills.iter().all(|s| s.trim().is_empty()) {
        return Err(AppError::Validation("skills cannot be empty".to_string()));
    }

    let (path, adherence) = state
        .pipeline
        .build_path(domain, &request.skills, request.style)
        .await?;

    Ok(Json(LearningPathResponse { path, adherence }))
}

/// POST /api/v1/learning-path/enrich
///
/// Resolves a path's topics into links. Lookups that fail come back as `not_found`.
pub async fn handle_enrich(
    State(state): State<AppState>,
    Json(request): Json<EnrichRequest>,
) -> Result<Json<EnrichResponse>, AppError> {
    let domain = require_domain(&request.domain)?;
    let path = state.pipeline.enrich(request.path, domain).await;
    Ok(Json(EnrichResponse { path }))
}

/// POST /api/v1/plan
///
/// Full pipeline: analysis → learning path → enrichment.
/// A domain without emerging roles is a 200 with `status: "no_roles"`.
pub async fn handle_plan(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, AppError> {
    let domain = require_domain(&request.domain)?;
    let session_id = request.session_id.unwrap_or_else(Uuid::new_v4);

    let mut cache = state.sessions.checkout(session_id).await;
    let outcome = state.pipeline.run(domain, request.style, &mut cache).await;
    state.sessions.save(session_id, cache).await;

    let outcome = outcome?;
    info!("Plan for session {} ended at {}", session_id, outcome.stage());

    let response = match outcome {
        PipelineOutcome::NoRoles { analysis } => PlanResponse {
            session_id,
            status: PlanStatus::NoRoles,
            analysis,
            path: None,
            adherence: None,
            message: Some(NO_ROLES_MESSAGE.to_string()),
        },
        PipelineOutcome::Enriched {
            analysis,
            path,
            adherence,
        } => PlanResponse {
            session_id,
            status: PlanStatus::Enriched,
            analysis,
            path: Some(path),
            adherence: Some(adherence),
            message: None,
        },
    };

    Ok(Json(response))
}
