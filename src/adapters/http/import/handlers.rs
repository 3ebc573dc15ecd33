//! HTTP handlers for import endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::adapters::http::cancel::spawn_cancellable;
use crate::adapters::http::error::{ApiError, ErrorResponse};
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::query::PolicyQuery;
use crate::application::handlers::{RunImportCommand, RunImportHandler};
use crate::domain::import::RecordKind;

#[derive(Clone)]
pub struct ImportHandlers {
    run_handler: Arc<RunImportHandler>,
}

impl ImportHandlers {
    pub fn new(run_handler: Arc<RunImportHandler>) -> Self {
        Self { run_handler }
    }
}

/// POST /api/imports/:kind?policy= - Reconcile a bulk document
pub async fn run_import(
    State(handlers): State<ImportHandlers>,
    RequireAuth(actor): RequireAuth,
    Path(kind): Path<String>,
    Query(params): Query<PolicyQuery>,
    Json(document): Json<Value>,
) -> Response {
    let kind = match kind.parse::<RecordKind>() {
        Ok(kind) => kind,
        Err(e) => {
            return (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found(e.to_string())))
                .into_response()
        }
    };
    let policy = match params.policy() {
        Ok(policy) => policy,
        Err(e) => return e.into_response(),
    };

    let cmd = RunImportCommand {
        tenant_id: actor.tenant_id,
        kind,
        document,
        policy,
    };

    let handler = handlers.run_handler.clone();
    let result = spawn_cancellable(move |token| async move {
        handler.handle(cmd, &token).await.map_err(ApiError::from)
    })
    .await;

    match result {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => e.into_response(),
    }
}
