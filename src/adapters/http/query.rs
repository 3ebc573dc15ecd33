//! Query parameters shared by the import endpoints.

use axum::http::StatusCode;
use serde::Deserialize;

use super::error::{ApiError, ErrorResponse};
use crate::domain::foundation::ValidationError;
use crate::domain::import::DuplicatePolicy;

/// `?policy=skip|replace`; absent means skip.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyQuery {
    #[serde(default)]
    pub policy: Option<String>,
}

impl PolicyQuery {
    pub fn policy(&self) -> Result<DuplicatePolicy, ApiError> {
        match &self.policy {
            None => Ok(DuplicatePolicy::default()),
            Some(raw) => raw.parse().map_err(|e: ValidationError| {
                ApiError::new(StatusCode::BAD_REQUEST, ErrorResponse::bad_request(e.to_string()))
            }),
        }
    }
}
