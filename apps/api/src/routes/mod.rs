pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::email::handlers as email_handlers;
use crate::matching::handlers as matching_handlers;
use crate::profile::handlers as profile_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile API
        .route("/api/v1/profile", put(profile_handlers::handle_upsert_profile))
        .route("/api/v1/profile", get(profile_handlers::handle_get_profile))
        // Lead store + scoring API
        .route("/api/v1/projects", post(matching_handlers::handle_create_project))
        .route("/api/v1/projects", get(matching_handlers::handle_list_projects))
        .route(
            "/api/v1/projects/score-all",
            post(matching_handlers::handle_score_all),
        )
        .route("/api/v1/projects/:id", get(matching_handlers::handle_get_project))
        .route(
            "/api/v1/projects/:id/score",
            post(matching_handlers::handle_score_project),
        )
        .route(
            "/api/v1/projects/:id/analyze",
            post(matching_handlers::handle_analyze_project),
        )
        // Email API
        .route(
            "/api/v1/projects/:id/emails",
            post(email_handlers::handle_generate_email),
        )
        .route(
            "/api/v1/projects/:id/emails",
            get(email_handlers::handle_list_project_emails),
        )
        .route("/api/v1/emails/:id", get(email_handlers::handle_get_email))
        .with_state(state)
}
