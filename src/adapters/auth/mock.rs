//! Mock session validator for tests.
//!
//! ```ignore
//! let validator = MockSessionValidator::new()
//!     .with_test_actor("valid-token", "actor-1", "club-1");
//! let actor = validator.validate("valid-token").await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{ActorId, AuthError, AuthenticatedActor, TenantId};
use crate::ports::SessionValidator;

/// Maps tokens to actors. Unknown tokens return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedActor>>,
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actor(mut self, token: impl Into<String>, actor: AuthenticatedActor) -> Self {
        self.tokens.get_mut().insert(token.into(), actor);
        self
    }

    /// Registers a token for an actor of the given tenant.
    ///
    /// Panics on an empty id; test helper only.
    pub fn with_test_actor(
        self,
        token: impl Into<String>,
        actor_id: &str,
        tenant_id: &str,
    ) -> Self {
        let actor = AuthenticatedActor::new(
            ActorId::new(actor_id).expect("test actor id"),
            TenantId::new(tenant_id).expect("test tenant id"),
            format!("{}@test.example.com", actor_id),
        );
        self.with_actor(token, actor)
    }

    /// Every validation returns `error` until cleared.
    pub fn with_error(mut self, error: AuthError) -> Self {
        *self.force_error.get_mut() = Some(error);
        self
    }

    pub async fn clear_error(&self) {
        *self.force_error.write().await = None;
    }

    pub async fn remove_token(&self, token: &str) {
        self.tokens.write().await.remove(token);
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedActor, AuthError> {
        if let Some(error) = self.force_error.read().await.clone() {
            return Err(error);
        }

        self.tokens
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn accepts_registered_token() {
        let validator = MockSessionValidator::new().with_test_actor("tok", "actor-1", "club-1");

        let actor = validator.validate("tok").await.unwrap();

        assert_eq!(actor.id.as_str(), "actor-1");
        assert_eq!(actor.tenant_id.as_str(), "club-1");
    }

    #[tokio::test]
    async fn rejects_unknown_and_removed_tokens() {
        let validator = MockSessionValidator::new().with_test_actor("tok", "actor-1", "club-1");
        assert!(matches!(
            validator.validate("other").await,
            Err(AuthError::InvalidToken)
        ));

        validator.remove_token("tok").await;
        assert!(validator.validate("tok").await.is_err());
    }

    #[tokio::test]
    async fn forced_error_until_cleared() {
        let validator = MockSessionValidator::new()
            .with_test_actor("tok", "actor-1", "club-1")
            .with_error(AuthError::service_unavailable("down"));

        assert!(validator.validate("tok").await.unwrap_err().is_transient());

        validator.clear_error().await;
        assert!(validator.validate("tok").await.is_ok());
    }
}
