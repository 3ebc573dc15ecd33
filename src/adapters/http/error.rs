//! JSON error body and the status mapping of application errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use crate::application::handlers::CommitDraftError;
use crate::domain::foundation::ErrorCode;
use crate::domain::import::ImportError;
use crate::domain::onboarding::OnboardingError;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

/// An error body with its status, ready to return from a handler.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, body: ErrorResponse) -> Self {
        Self { status, body }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<OnboardingError> for ApiError {
    fn from(err: OnboardingError) -> Self {
        let status = match &err {
            OnboardingError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            OnboardingError::ProviderUnavailable(_) => StatusCode::BAD_GATEWAY,
            OnboardingError::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            OnboardingError::Infrastructure(msg) => {
                error!(error = %msg, "Onboarding infrastructure failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let mut body = ErrorResponse::new(err.code(), err.message());
        if let OnboardingError::ValidationFailed { field, .. } = &err {
            body = body.with_details(json!({ "field": field }));
        }
        ApiError::new(status, body)
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        let status = match &err {
            ImportError::InvalidDocument(_)
            | ImportError::Validation { .. }
            | ImportError::DraftIncomplete => StatusCode::UNPROCESSABLE_ENTITY,
            ImportError::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
            ImportError::Cancelled(_) => StatusCode::SERVICE_UNAVAILABLE,
            ImportError::Store(msg) => {
                error!(error = %msg, "Import aborted by store failure");
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        let mut body = ErrorResponse::new(err.code(), err.to_string());
        match &err {
            ImportError::Validation { index, source } => {
                body = body.with_details(json!({ "index": index, "field": source.field() }));
            }
            ImportError::DeadlineExceeded(phase) | ImportError::Cancelled(phase) => {
                body = body.with_details(json!({ "phase": phase }));
            }
            _ => {}
        }
        ApiError::new(status, body)
    }
}

impl From<CommitDraftError> for ApiError {
    fn from(err: CommitDraftError) -> Self {
        match err {
            CommitDraftError::Onboarding(e) => e.into(),
            CommitDraftError::Import(e) => e.into(),
        }
    }
}
