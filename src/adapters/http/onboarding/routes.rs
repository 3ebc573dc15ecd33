//! HTTP routes for onboarding endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{chat, commit, get_config, start, OnboardingHandlers};

/// Creates the onboarding router, mounted under `/api/onboarding`.
pub fn onboarding_routes(handlers: OnboardingHandlers) -> Router {
    Router::new()
        .route("/start", post(start))
        .route("/chat", post(chat))
        .route("/config", get(get_config))
        .route("/commit", post(commit))
        .with_state(handlers)
}
