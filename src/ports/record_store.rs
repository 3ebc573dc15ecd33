//! Backing record store port.
//!
//! Row-level select / insert / update / delete / upsert, always scoped by
//! tenant. No schema is implied: rows are open field maps, tables are the
//! logical [`Table`] names. Multi-row transactions are not offered.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::foundation::{RowId, TenantId};
use crate::domain::import::{Filter, Row, Table};

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Row {id} not found in {table}")]
    NotFound { table: Table, id: RowId },

    #[error("Write rejected: {0}")]
    Rejected(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn rejected(message: impl Into<String>) -> Self {
        StoreError::Rejected(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable(message.into())
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Rows of `table` matching every condition of `filter`.
    async fn select(
        &self,
        tenant: &TenantId,
        table: Table,
        filter: &Filter,
    ) -> Result<Vec<Row>, StoreError>;

    /// Inserts a new row and returns it with its assigned id.
    async fn insert(
        &self,
        tenant: &TenantId,
        table: Table,
        values: Map<String, Value>,
    ) -> Result<Row, StoreError>;

    /// Overwrites the given fields of an existing row; other fields are kept.
    async fn update(
        &self,
        tenant: &TenantId,
        table: Table,
        id: RowId,
        values: Map<String, Value>,
    ) -> Result<Row, StoreError>;

    async fn delete(&self, tenant: &TenantId, table: Table, id: RowId) -> Result<(), StoreError>;

    /// Updates the row whose `conflict_keys` fields equal those in `values`,
    /// or inserts one if none does.
    async fn upsert(
        &self,
        tenant: &TenantId,
        table: Table,
        values: Map<String, Value>,
        conflict_keys: &[&str],
    ) -> Result<Row, StoreError>;
}
