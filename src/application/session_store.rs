//! Session store over the `SessionRepository` port.
//!
//! Adds what the repository alone cannot: per-actor serialization of
//! start/chat, the start debounce, and the `SessionNotFound` contract.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::{ActorId, Timestamp};
use crate::domain::onboarding::{
    ClubConfigDraft, ConfigFragment, ConversationSession, OnboardingError, Turn,
};
use crate::ports::{SessionRepository, SessionRepositoryError};

impl From<SessionRepositoryError> for OnboardingError {
    fn from(err: SessionRepositoryError) -> Self {
        OnboardingError::infrastructure(err.to_string())
    }
}

pub struct SessionStore {
    repository: Arc<dyn SessionRepository>,
    debounce: Duration,
    locks: Mutex<HashMap<ActorId, Arc<Mutex<()>>>>,
}

impl SessionStore {
    pub fn new(repository: Arc<dyn SessionRepository>, debounce: Duration) -> Self {
        Self {
            repository,
            debounce,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Serializes every operation on one actor's session. Hold the guard
    /// across the model round trip so a second request waits its turn.
    pub async fn lock(&self, actor_id: &ActorId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(actor_id.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// The assistant turn to replay when a start repeats within the
    /// debounce window. `None` means a new session should be created.
    pub async fn recent_start(&self, actor_id: &ActorId) -> Result<Option<Turn>, OnboardingError> {
        let now = Timestamp::now();
        Ok(self
            .repository
            .get(actor_id)
            .await?
            .filter(|session| session.started_within(self.debounce, &now))
            .and_then(|session| session.last_assistant_turn().cloned()))
    }

    /// Starts a fresh session, discarding any previous one.
    pub async fn create(
        &self,
        actor_id: ActorId,
        draft: ClubConfigDraft,
    ) -> Result<ConversationSession, OnboardingError> {
        let session = ConversationSession::new(actor_id, draft);
        self.repository.put(session.clone()).await?;
        Ok(session)
    }

    pub async fn get(&self, actor_id: &ActorId) -> Result<ConversationSession, OnboardingError> {
        self.repository
            .get(actor_id)
            .await?
            .ok_or_else(|| OnboardingError::session_not_found(actor_id.clone()))
    }

    pub async fn save(&self, session: ConversationSession) -> Result<(), OnboardingError> {
        self.repository.put(session).await?;
        Ok(())
    }

    pub async fn append_turn(
        &self,
        actor_id: &ActorId,
        turn: Turn,
    ) -> Result<ConversationSession, OnboardingError> {
        let mut session = self.get(actor_id).await?;
        session.append_turn(turn);
        self.save(session.clone()).await?;
        Ok(session)
    }

    pub async fn get_draft(&self, actor_id: &ActorId) -> Result<ClubConfigDraft, OnboardingError> {
        Ok(self.get(actor_id).await?.draft().clone())
    }

    pub async fn merge_draft(
        &self,
        actor_id: &ActorId,
        fragment: &ConfigFragment,
    ) -> Result<ClubConfigDraft, OnboardingError> {
        let mut session = self.get(actor_id).await?;
        session.merge_fragment(fragment);
        let draft = session.draft().clone();
        self.save(session).await?;
        Ok(draft)
    }

    /// Drops expired sessions and the locks nobody holds.
    pub async fn evict_expired(&self) -> Result<usize, OnboardingError> {
        let evicted = self.repository.evict_expired(&Timestamp::now()).await?;
        self.locks
            .lock()
            .await
            .retain(|_, lock| Arc::strong_count(lock) > 1);
        Ok(evicted)
    }
}
