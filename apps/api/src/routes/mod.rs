pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::letter::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/roles/extract", post(handlers::handle_extract_role))
        .route("/api/v1/cover-letters", post(handlers::handle_generate))
        .route(
            "/api/v1/cover-letters/check",
            post(handlers::handle_check),
        )
        .route(
            "/api/v1/cover-letters/pdf",
            post(handlers::handle_render_pdf),
        )
        .with_state(state)
}
