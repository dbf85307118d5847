pub mod dto;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::{routing::get, Router};

// Re-export for convenience
pub use crate::infrastructure::app_state::AppState;

/// Full application router: `/api/*` plus a top-level `/health`
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", routes::create_api_router(state.clone()))
        .route("/health", get(routes::health::health_handler))
        .with_state(state)
}
