pub mod auth;
pub mod debug;
pub mod directory;
pub mod health;
pub mod me;
pub mod profiles;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::app::AppState;
use crate::middleware::session_gate;

/// Build the API router with all routes
pub fn api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    // Edit surface sits behind the cookie-presence gate; handlers still
    // require a verified bearer token on top.
    let edit_routes = Router::new()
        .route(
            "/profiles/me",
            get(profiles::get_my_profile).put(profiles::update_my_profile),
        )
        .route("/profiles/me/avatar", post(profiles::upload_avatar))
        .route("/profiles/me/gallery", post(profiles::upload_gallery))
        .layer(from_fn_with_state(state, session_gate));

    Router::new()
        // Public routes
        .route("/health", get(health::health_check))
        .route("/auth/signup", post(auth::sign_up))
        .route("/auth/signout", post(auth::sign_out))
        .route("/auth/session", get(auth::get_session))
        .route("/me", get(me::get_me))
        // Directory search
        .route("/profiles", get(directory::search_profiles))
        // Profile edit (gated)
        .merge(edit_routes)
        // Public profile view
        .route("/profiles/:username", get(profiles::get_profile_by_username))
        // Diagnostics
        .route("/debug/profiles", get(debug::list_profiles))
}
