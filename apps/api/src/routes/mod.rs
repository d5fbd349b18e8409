pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/analysis", post(handlers::handle_analysis))
        .route("/api/v1/learning-path", post(handlers::handle_learning_path))
        .route(
            "/api/v1/learning-path/enrich",
            post(handlers::handle_enrich),
        )
        .route("/api/v1/plan", post(handlers::handle_plan))
        .with_state(state)
}
