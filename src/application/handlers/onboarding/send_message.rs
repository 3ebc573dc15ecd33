//! SendMessageHandler - one actor message and the assistant reply.

use std::sync::Arc;

use super::assistant_turn::take_assistant_turn;
use crate::application::{ProviderGateway, SessionStore};
use crate::domain::foundation::{ActorId, TurnId};
use crate::domain::onboarding::{is_complete, ClubConfigDraft, OnboardingError, Turn};

#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    pub actor_id: ActorId,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct SendMessageResult {
    pub turn_id: TurnId,
    pub display_text: String,
    pub draft: ClubConfigDraft,
    pub complete: bool,
}

pub struct SendMessageHandler {
    sessions: Arc<SessionStore>,
    gateway: Arc<ProviderGateway>,
}

impl SendMessageHandler {
    pub fn new(sessions: Arc<SessionStore>, gateway: Arc<ProviderGateway>) -> Self {
        Self { sessions, gateway }
    }

    pub async fn handle(&self, cmd: SendMessageCommand) -> Result<SendMessageResult, OnboardingError> {
        if cmd.message.trim().is_empty() {
            return Err(OnboardingError::validation("message", "must not be empty"));
        }

        let _guard = self.sessions.lock(&cmd.actor_id).await;
        let session = self
            .sessions
            .append_turn(&cmd.actor_id, Turn::actor(cmd.message))
            .await?;

        let (turn, draft) = take_assistant_turn(&self.sessions, &self.gateway, &session).await?;
        Ok(SendMessageResult {
            turn_id: turn.id,
            display_text: turn.display_text,
            complete: is_complete(&draft),
            draft,
        })
    }
}
