//! CommitDraftHandler - imports a completed draft for the actor's tenant.

use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::application::{Reconciler, SessionStore};
use crate::domain::foundation::{ActorId, TenantId};
use crate::domain::import::{DuplicatePolicy, ImportBatch, ImportError, ImportOutcome};
use crate::domain::onboarding::OnboardingError;

#[derive(Debug, Clone)]
pub struct CommitDraftCommand {
    pub actor_id: ActorId,
    pub tenant_id: TenantId,
    pub policy: DuplicatePolicy,
}

#[derive(Debug, Clone, Error)]
pub enum CommitDraftError {
    #[error(transparent)]
    Onboarding(#[from] OnboardingError),

    #[error(transparent)]
    Import(#[from] ImportError),
}

pub struct CommitDraftHandler {
    sessions: Arc<SessionStore>,
    reconciler: Arc<Reconciler>,
}

impl CommitDraftHandler {
    pub fn new(sessions: Arc<SessionStore>, reconciler: Arc<Reconciler>) -> Self {
        Self {
            sessions,
            reconciler,
        }
    }

    pub async fn handle(
        &self,
        cmd: CommitDraftCommand,
        cancel: &CancellationToken,
    ) -> Result<ImportOutcome, CommitDraftError> {
        let draft = self.sessions.get_draft(&cmd.actor_id).await?;
        let batch = ImportBatch::from_draft(&draft, cmd.policy)?;
        Ok(self.reconciler.run(&cmd.tenant_id, batch, cancel).await?)
    }
}
