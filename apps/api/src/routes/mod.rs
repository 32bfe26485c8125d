pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/reports/:id", get(handlers::handle_get_report))
        // Short alias for /api/v1/analyze
        .route("/analyze", post(handlers::handle_analyze))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
