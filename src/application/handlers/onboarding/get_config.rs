//! GetConfigHandler - current draft and progress.

use std::sync::Arc;

use crate::application::SessionStore;
use crate::domain::foundation::ActorId;
use crate::domain::onboarding::{is_complete, ClubConfigDraft, OnboardingError, OnboardingStep};

#[derive(Debug, Clone)]
pub struct GetConfigQuery {
    pub actor_id: ActorId,
}

#[derive(Debug, Clone)]
pub struct GetConfigResult {
    pub draft: ClubConfigDraft,
    pub step: OnboardingStep,
    pub complete: bool,
}

pub struct GetConfigHandler {
    sessions: Arc<SessionStore>,
}

impl GetConfigHandler {
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }

    pub async fn handle(&self, query: GetConfigQuery) -> Result<GetConfigResult, OnboardingError> {
        let session = self.sessions.get(&query.actor_id).await?;
        let draft = session.draft().clone();
        Ok(GetConfigResult {
            complete: is_complete(&draft),
            step: session.step(),
            draft,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::onboarding::test_support::{actor, sessions};
    use crate::domain::onboarding::{FleetItem, FleetKind};
    use std::time::Duration;

    #[tokio::test]
    async fn reports_step_from_seeded_draft() {
        let sessions = sessions(Duration::from_secs(5));
        let mut draft = ClubConfigDraft::new();
        draft.fleet_items.push(FleetItem::new(FleetKind::Plane, "F-GABC"));
        sessions.create(actor(), draft).await.unwrap();

        let result = GetConfigHandler::new(sessions)
            .handle(GetConfigQuery { actor_id: actor() })
            .await
            .unwrap();

        assert_eq!(result.step, OnboardingStep::Members);
        assert!(!result.complete);
    }

    #[tokio::test]
    async fn unknown_actor_is_not_found() {
        let err = GetConfigHandler::new(sessions(Duration::from_secs(5)))
            .handle(GetConfigQuery { actor_id: actor() })
            .await
            .unwrap_err();
        assert!(matches!(err, OnboardingError::SessionNotFound(_)));
    }
}
