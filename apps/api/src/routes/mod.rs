pub mod health;
pub mod index;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::community::handlers as community;
use crate::state::AppState;
use crate::theme;
use crate::tracker::handlers as tracker;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::index_handler))
        .route("/health", get(health::health_handler))
        // Community feed
        .route(
            "/api/v1/posts",
            get(community::handle_list_posts).post(community::handle_create_post),
        )
        .route(
            "/api/v1/posts/:id/like",
            post(community::handle_toggle_like),
        )
        .route(
            "/api/v1/posts/:id/comments",
            post(community::handle_add_comment),
        )
        // Pain tracker
        .route(
            "/api/v1/pain-entries",
            get(tracker::handle_list_entries).post(tracker::handle_record_entry),
        )
        .route("/api/v1/severity", get(tracker::handle_severity))
        // Auth
        .route("/api/v1/auth/sign-up", post(auth::handle_sign_up))
        .route("/api/v1/auth/sign-in", post(auth::handle_sign_in))
        .route("/api/v1/auth/sign-out", post(auth::handle_sign_out))
        .route("/api/v1/auth/session", get(auth::handle_session))
        // Theme
        .route("/api/v1/theme", get(theme::handle_get_theme))
        .route("/api/v1/theme/toggle", post(theme::handle_toggle_theme))
        .with_state(state)
}
