//! HTTP adapters - REST API implementations.
//!
//! Each area has its own router; [`api_router`] mounts them behind the auth
//! middleware and adds the unauthenticated health check.

mod cancel;
pub mod error;
pub mod import;
pub mod middleware;
pub mod onboarding;
mod query;

pub use error::{ApiError, ErrorResponse};
pub use import::{import_routes, ImportHandlers};
pub use middleware::{auth_middleware, AuthState, RequireAuth};
pub use onboarding::{onboarding_routes, OnboardingHandlers};

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use serde_json::{json, Value};

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn api_router(
    onboarding: OnboardingHandlers,
    imports: ImportHandlers,
    validator: AuthState,
) -> Router {
    Router::new()
        .nest("/api/onboarding", onboarding_routes(onboarding))
        .nest("/api/imports", import_routes(imports))
        .layer(from_fn_with_state(validator, auth_middleware))
        .route("/health", get(health))
}
