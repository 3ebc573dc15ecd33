//! Conversation session repository port.
//!
//! Keyed by actor: at most one live session per actor. Implementations own
//! the expiry policy, so an expired session reads as absent.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{ActorId, Timestamp};
use crate::domain::onboarding::ConversationSession;

#[derive(Debug, Clone, Error)]
pub enum SessionRepositoryError {
    #[error("Session storage unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to serialize session: {0}")]
    Serialization(String),
}

/// Repository port for onboarding sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Returns the live session for `actor_id`, or `None` if absent or expired.
    async fn get(&self, actor_id: &ActorId)
        -> Result<Option<ConversationSession>, SessionRepositoryError>;

    /// Stores `session`, replacing any previous one for the same actor.
    async fn put(&self, session: ConversationSession) -> Result<(), SessionRepositoryError>;

    /// Removes the session. Returns whether one existed.
    async fn delete(&self, actor_id: &ActorId) -> Result<bool, SessionRepositoryError>;

    /// Drops every session idle past its time-to-live at `now`.
    ///
    /// Returns the number evicted.
    async fn evict_expired(&self, now: &Timestamp) -> Result<usize, SessionRepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn session_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SessionRepository) {}
    }
}
