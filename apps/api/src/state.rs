use crate::pipeline::{Pipeline, SessionStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    /// Per-session analysis caches. Owned here, never by the pipeline.
    pub sessions: SessionStore,
}
