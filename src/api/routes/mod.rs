pub mod auth;
pub mod health;
pub mod movies;
pub mod party;
pub mod profile;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::api::middleware::auth_middleware;
use crate::api::AppState;

/// Create the main API router
pub fn create_api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .nest("/auth", auth::create_auth_router())
        .nest("/parties", create_party_router(state.clone()))
        .nest("/profile", create_profile_router(state.clone()))
        .nest("/movies", create_movies_router(state.clone()))
        .route("/health", get(health::health_handler))
        .with_state(state)
}

/// Create party router; every route requires auth
fn create_party_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(party::create_party))
        .route("/join", post(party::join_party))
        .route("/:partyId", get(party::get_party_details))
        .route("/:partyId/members", post(party::add_member))
        .route(
            "/:partyId/invitations",
            post(party::create_invitation).get(party::list_invitations),
        )
        .route("/:partyId/movies", post(party::add_movie))
        .route("/:partyId/select", post(party::select_movie))
        .route("/:partyId/movies/:movieId/watched", post(party::mark_watched))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

/// Create profile router
fn create_profile_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(profile::get_profile).put(profile::update_profile))
        .route("/history", get(profile::get_watch_history))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

/// Create movies router
fn create_movies_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/search", get(movies::search_movies))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
