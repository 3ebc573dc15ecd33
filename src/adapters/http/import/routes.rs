//! HTTP routes for import endpoints.

use axum::{routing::post, Router};

use super::handlers::{run_import, ImportHandlers};

/// Creates the import router, mounted under `/api/imports`.
pub fn import_routes(handlers: ImportHandlers) -> Router {
    Router::new()
        .route("/:kind", post(run_import))
        .with_state(handlers)
}
