//! Bearer token verification.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedActor};

/// Resolves a bearer token to the actor and tenant it speaks for.
///
/// Unknown tokens yield `AuthError::InvalidToken`; an unreachable identity
/// backend yields `AuthError::ServiceUnavailable`.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// `token` arrives without the `Bearer ` prefix.
    async fn validate(&self, token: &str) -> Result<AuthenticatedActor, AuthError>;
}
