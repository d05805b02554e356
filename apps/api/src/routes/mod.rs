pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/jobs", post(handlers::handle_create_job))
        .route("/api/v1/jobs/:id", get(handlers::handle_get_job))
        .route(
            "/api/v1/jobs/:id/analyses",
            post(handlers::handle_analyze).get(handlers::handle_list_analyses),
        )
        .route(
            "/api/v1/jobs/:id/analyses/batch",
            post(handlers::handle_analyze_batch),
        )
        .with_state(state)
}
