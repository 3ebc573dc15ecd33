//! RunImportHandler - reconciles an operator-submitted bulk document.

use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::application::Reconciler;
use crate::domain::foundation::TenantId;
use crate::domain::import::{DuplicatePolicy, ImportBatch, ImportError, ImportOutcome, RecordKind};

#[derive(Debug, Clone)]
pub struct RunImportCommand {
    pub tenant_id: TenantId,
    pub kind: RecordKind,
    pub document: Value,
    pub policy: DuplicatePolicy,
}

pub struct RunImportHandler {
    reconciler: Arc<Reconciler>,
}

impl RunImportHandler {
    pub fn new(reconciler: Arc<Reconciler>) -> Self {
        Self { reconciler }
    }

    pub async fn handle(
        &self,
        cmd: RunImportCommand,
        cancel: &CancellationToken,
    ) -> Result<ImportOutcome, ImportError> {
        let batch = ImportBatch::from_document(cmd.kind, cmd.document, cmd.policy)?;
        self.reconciler.run(&cmd.tenant_id, batch, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryRecordStore;
    use crate::config::PhaseDeadlines;
    use crate::domain::import::Table;
    use serde_json::json;

    fn tenant() -> TenantId {
        TenantId::new("club-1").unwrap()
    }

    fn handler(store: Arc<InMemoryRecordStore>) -> RunImportHandler {
        RunImportHandler::new(Arc::new(Reconciler::new(
            store,
            PhaseDeadlines::default(),
            "BALANCE",
        )))
    }

    fn command(kind: RecordKind, document: Value) -> RunImportCommand {
        RunImportCommand {
            tenant_id: tenant(),
            kind,
            document,
            policy: DuplicatePolicy::Skip,
        }
    }

    #[tokio::test]
    async fn fleet_document_is_imported() {
        let store = Arc::new(InMemoryRecordStore::new());
        let document = json!({"aircraft": [
            {"name": "Robin", "type": "PLANE", "registration": "F-GABC", "hourly_rate": 150},
            {"name": "Ikarus", "type": "ULM", "registration": "56-ABC"},
        ]});

        let outcome = handler(store.clone())
            .handle(command(RecordKind::Fleet, document), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.counts(), (2, 0, 0));
        let rows = store.rows(&tenant(), Table::Aircraft).await;
        assert_eq!(rows[1].f64_field("capacity"), Some(2.0));
    }

    #[tokio::test]
    async fn extra_top_level_field_rejects_document() {
        let document = json!({"aircraft": [], "members": []});

        let err = handler(Arc::new(InMemoryRecordStore::new()))
            .handle(command(RecordKind::Fleet, document), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ImportError::InvalidDocument(_)));
    }

    #[tokio::test]
    async fn balances_use_configured_entry_type() {
        let store = Arc::new(InMemoryRecordStore::new());
        store
            .seed(&tenant(), Table::Users, json!({"login": "jdupont"}))
            .await;
        store
            .seed(
                &tenant(),
                Table::AccountEntryTypes,
                json!({"code": "BALANCE", "is_credit": false}),
            )
            .await;
        let document = json!({"balances": [
            {"user_login": "jdupont", "amount": 42.5, "date": "2024-01-01"},
        ]});

        let outcome = handler(store.clone())
            .handle(command(RecordKind::Balances, document), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.counts(), (1, 0, 0));
        let rows = store.rows(&tenant(), Table::AccountEntries).await;
        assert_eq!(rows[0].f64_field("amount"), Some(42.5));
    }
}
