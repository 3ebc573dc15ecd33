//! In-memory record store.
//!
//! Rows are kept per tenant and table in insertion order. Tests seed
//! reference rows with [`InMemoryRecordStore::seed`] and can make writes
//! to one table fail with [`InMemoryRecordStore::fail_writes_to`].

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{RowId, TenantId};
use crate::domain::import::{Filter, Row, Table};
use crate::ports::{RecordStore, StoreError};

type TableKey = (TenantId, Table);

#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    rows: Arc<RwLock<HashMap<TableKey, Vec<Row>>>>,
    failing: Arc<RwLock<HashSet<Table>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a row directly, bypassing failure injection.
    pub async fn seed(&self, tenant: &TenantId, table: Table, values: Value) -> Row {
        let values = match values {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let row = Row::new(RowId::new(), values);
        self.rows
            .write()
            .await
            .entry((tenant.clone(), table))
            .or_default()
            .push(row.clone());
        row
    }

    /// Every write to `table` fails with `StoreError::Rejected` from now on.
    pub async fn fail_writes_to(&self, table: Table) {
        self.failing.write().await.insert(table);
    }

    pub async fn heal(&self) {
        self.failing.write().await.clear();
    }

    /// All rows of one table, in insertion order.
    pub async fn rows(&self, tenant: &TenantId, table: Table) -> Vec<Row> {
        self.rows
            .read()
            .await
            .get(&(tenant.clone(), table))
            .cloned()
            .unwrap_or_default()
    }

    async fn check_writable(&self, table: Table) -> Result<(), StoreError> {
        if self.failing.read().await.contains(&table) {
            return Err(StoreError::rejected(format!("writes to {} are failing", table)));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn select(
        &self,
        tenant: &TenantId,
        table: Table,
        filter: &Filter,
    ) -> Result<Vec<Row>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .get(&(tenant.clone(), table))
            .map(|rows| {
                rows.iter()
                    .filter(|row| filter.matches(&row.values))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(
        &self,
        tenant: &TenantId,
        table: Table,
        values: Map<String, Value>,
    ) -> Result<Row, StoreError> {
        self.check_writable(table).await?;
        let row = Row::new(RowId::new(), values);
        self.rows
            .write()
            .await
            .entry((tenant.clone(), table))
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        tenant: &TenantId,
        table: Table,
        id: RowId,
        values: Map<String, Value>,
    ) -> Result<Row, StoreError> {
        self.check_writable(table).await?;
        let mut rows = self.rows.write().await;
        let row = rows
            .get_mut(&(tenant.clone(), table))
            .and_then(|rows| rows.iter_mut().find(|r| r.id == id))
            .ok_or(StoreError::NotFound { table, id })?;
        row.values.extend(values);
        Ok(row.clone())
    }

    async fn delete(&self, tenant: &TenantId, table: Table, id: RowId) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        let table_rows = rows
            .get_mut(&(tenant.clone(), table))
            .ok_or(StoreError::NotFound { table, id })?;
        let before = table_rows.len();
        table_rows.retain(|r| r.id != id);
        if table_rows.len() == before {
            return Err(StoreError::NotFound { table, id });
        }
        Ok(())
    }

    async fn upsert(
        &self,
        tenant: &TenantId,
        table: Table,
        values: Map<String, Value>,
        conflict_keys: &[&str],
    ) -> Result<Row, StoreError> {
        self.check_writable(table).await?;
        let mut rows = self.rows.write().await;
        let table_rows = rows.entry((tenant.clone(), table)).or_default();

        let existing = table_rows.iter_mut().find(|row| {
            conflict_keys
                .iter()
                .all(|key| row.values.get(*key).is_some() && row.values.get(*key) == values.get(*key))
        });

        match existing {
            Some(row) => {
                row.values.extend(values);
                Ok(row.clone())
            }
            None => {
                let row = Row::new(RowId::new(), values);
                table_rows.push(row.clone());
                Ok(row)
            }
        }
    }
}
