//! In-memory onboarding session repository.
//!
//! Sessions live in a process-local map keyed by actor. Expiry is lazy:
//! a read past the TTL deletes the entry and reports it absent, and
//! `evict_expired` sweeps whatever nobody read.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::domain::foundation::{ActorId, Timestamp};
use crate::domain::onboarding::ConversationSession;
use crate::ports::{SessionRepository, SessionRepositoryError};

#[derive(Debug, Clone)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<ActorId, ConversationSession>>>,
    ttl: Duration,
}

impl InMemorySessionRepository {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Number of stored sessions, expired ones included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn get(
        &self,
        actor_id: &ActorId,
    ) -> Result<Option<ConversationSession>, SessionRepositoryError> {
        let now = Timestamp::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(actor_id) {
                None => return Ok(None),
                Some(session) if !session.is_expired(self.ttl, &now) => {
                    return Ok(Some(session.clone()))
                }
                Some(_) => {}
            }
        }

        // Re-check under the write lock; a put may have landed in between.
        let mut sessions = self.sessions.write().await;
        match sessions.get(actor_id) {
            Some(session) if session.is_expired(self.ttl, &now) => {
                sessions.remove(actor_id);
                Ok(None)
            }
            other => Ok(other.cloned()),
        }
    }

    async fn put(&self, session: ConversationSession) -> Result<(), SessionRepositoryError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.actor_id().clone(), session);
        Ok(())
    }

    async fn delete(&self, actor_id: &ActorId) -> Result<bool, SessionRepositoryError> {
        Ok(self.sessions.write().await.remove(actor_id).is_some())
    }

    async fn evict_expired(&self, now: &Timestamp) -> Result<usize, SessionRepositoryError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(self.ttl, now));
        Ok(before - sessions.len())
    }
}
