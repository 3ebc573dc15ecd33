//! Static bearer-token validator.
//!
//! Built once from `auth.static_tokens`. Identity is established upstream;
//! this adapter only maps the opaque token it was handed to an actor.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::config::StaticTokenEntry;
use crate::domain::foundation::{
    ActorId, AuthError, AuthenticatedActor, TenantId, ValidationError,
};
use crate::ports::SessionValidator;

#[derive(Debug, Clone, Default)]
pub struct StaticTokenValidator {
    tokens: HashMap<String, AuthenticatedActor>,
}

impl StaticTokenValidator {
    pub fn from_entries(entries: &[StaticTokenEntry]) -> Result<Self, ValidationError> {
        let tokens = entries
            .iter()
            .map(|entry| {
                let actor = AuthenticatedActor::new(
                    ActorId::new(&entry.actor_id)?,
                    TenantId::new(&entry.tenant_id)?,
                    &entry.email,
                );
                Ok((entry.token.clone(), actor))
            })
            .collect::<Result<_, ValidationError>>()?;

        Ok(Self { tokens })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl SessionValidator for StaticTokenValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedActor, AuthError> {
        self.tokens.get(token).cloned().ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(token: &str, actor: &str, tenant: &str) -> StaticTokenEntry {
        StaticTokenEntry {
            token: token.to_string(),
            actor_id: actor.to_string(),
            tenant_id: tenant.to_string(),
            email: format!("{}@club.example", actor),
        }
    }

    #[tokio::test]
    async fn maps_token_to_actor_and_tenant() {
        let validator =
            StaticTokenValidator::from_entries(&[entry("dev-1", "alice", "club-a")]).unwrap();

        let actor = validator.validate("dev-1").await.unwrap();
        assert_eq!(actor.tenant_id.as_str(), "club-a");
        assert!(matches!(
            validator.validate("dev-2").await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn empty_actor_id_is_rejected() {
        assert!(StaticTokenValidator::from_entries(&[entry("dev-1", "", "club-a")]).is_err());
    }
}
