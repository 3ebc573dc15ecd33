//! The verified caller of an API request.

use super::{ActorId, TenantId};
use thiserror::Error;

/// Who is calling and which club they act for. Every store access made on
/// their behalf is scoped by `tenant_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    pub id: ActorId,
    pub tenant_id: TenantId,
    pub email: String,
}

impl AuthenticatedActor {
    pub fn new(id: ActorId, tenant_id: TenantId, email: impl Into<String>) -> Self {
        Self {
            id,
            tenant_id,
            email: email.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Unknown, malformed, or revoked credential.
    #[error("invalid token")]
    InvalidToken,

    /// The validator could not answer; the caller may retry.
    #[error("auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ServiceUnavailable(_))
    }
}
