//! The assistant half of a turn, shared by start and chat.

use tracing::warn;

use crate::application::{ProviderGateway, SessionStore};
use crate::domain::onboarding::{
    extract, ClubConfigDraft, ConversationSession, OnboardingError, Turn,
    ONBOARDING_SYSTEM_PROMPT,
};

/// Sends the session history, records the reply and merges its fragment.
///
/// On provider failure nothing is recorded, so the actor turn already in
/// history can be resubmitted.
pub(super) async fn take_assistant_turn(
    sessions: &SessionStore,
    gateway: &ProviderGateway,
    session: &ConversationSession,
) -> Result<(Turn, ClubConfigDraft), OnboardingError> {
    let actor_id = session.actor_id();
    let text = gateway
        .send_turn(actor_id, session.turns(), ONBOARDING_SYSTEM_PROMPT)
        .await
        .map_err(|e| OnboardingError::provider_unavailable(e.to_string()))?;

    let extraction = extract(&text);
    if let Some(err) = &extraction.malformed {
        warn!(actor_id = %actor_id, error = %err, "Discarding malformed config fragment");
    }

    let turn = Turn::assistant(text, extraction);
    let session = sessions.append_turn(actor_id, turn.clone()).await?;
    let draft = match &turn.fragment {
        Some(fragment) => sessions.merge_draft(actor_id, fragment).await?,
        None => session.draft().clone(),
    };
    Ok((turn, draft))
}
