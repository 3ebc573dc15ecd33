//! Ties a spawned import to the lifetime of its request.
//!
//! The import runs on its own task; if the client goes away the handler
//! future is dropped, the guard fires, and the pipeline sees a cancelled
//! token at its next check.

use std::future::Future;

use axum::http::StatusCode;
use tokio_util::sync::CancellationToken;
use tracing::error;

use super::error::{ApiError, ErrorResponse};

pub async fn spawn_cancellable<T, F, Fut>(work: F) -> Result<T, ApiError>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    T: Send + 'static,
{
    let token = CancellationToken::new();
    let guard = token.clone().drop_guard();
    let joined = tokio::spawn(work(token)).await;
    guard.disarm();

    joined.unwrap_or_else(|e| {
        error!(error = %e, "Import task failed");
        Err(ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::internal("Import task failed"),
        ))
    })
}
