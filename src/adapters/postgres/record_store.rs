//! PostgreSQL implementation of RecordStore.
//!
//! Rows of every logical table live in one JSONB table keyed by tenant and
//! table name:
//!
//! ```sql
//! tenant_records(id UUID, tenant_id TEXT, table_name TEXT, data JSONB, created_at TIMESTAMPTZ)
//! ```
//!
//! Field names are always bound as parameters, never spliced into SQL.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Row as _};
use uuid::Uuid;

use crate::domain::foundation::{RowId, TenantId};
use crate::domain::import::{Condition, Filter, Row, Table};
use crate::ports::{RecordStore, StoreError};

#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the record table and its lookup index if missing.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tenant_records (
                id UUID PRIMARY KEY,
                tenant_id TEXT NOT NULL,
                table_name TEXT NOT NULL,
                data JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS tenant_records_scope_idx
                ON tenant_records (tenant_id, table_name)
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn select(
        &self,
        tenant: &TenantId,
        table: Table,
        filter: &Filter,
    ) -> Result<Vec<Row>, StoreError> {
        let mut query = select_query(tenant, table, filter);

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter().map(pg_row_to_row).collect()
    }

    async fn insert(
        &self,
        tenant: &TenantId,
        table: Table,
        values: Map<String, Value>,
    ) -> Result<Row, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO tenant_records (id, tenant_id, table_name, data)
            VALUES ($1, $2, $3, $4)
            RETURNING id, data
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant.as_str())
        .bind(table.as_str())
        .bind(Json(values))
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        pg_row_to_row(&row)
    }

    async fn update(
        &self,
        tenant: &TenantId,
        table: Table,
        id: RowId,
        values: Map<String, Value>,
    ) -> Result<Row, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE tenant_records SET data = data || $4
            WHERE id = $1 AND tenant_id = $2 AND table_name = $3
            RETURNING id, data
            "#,
        )
        .bind(id.as_uuid())
        .bind(tenant.as_str())
        .bind(table.as_str())
        .bind(Json(values))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => pg_row_to_row(&row),
            None => Err(StoreError::NotFound { table, id }),
        }
    }

    async fn delete(&self, tenant: &TenantId, table: Table, id: RowId) -> Result<(), StoreError> {
        let result = sqlx::query(
            "DELETE FROM tenant_records WHERE id = $1 AND tenant_id = $2 AND table_name = $3",
        )
        .bind(id.as_uuid())
        .bind(tenant.as_str())
        .bind(table.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { table, id });
        }
        Ok(())
    }

    /// Select-then-write; concurrent upserts on the same key may both insert.
    async fn upsert(
        &self,
        tenant: &TenantId,
        table: Table,
        values: Map<String, Value>,
        conflict_keys: &[&str],
    ) -> Result<Row, StoreError> {
        let mut filter = Filter::new();
        for key in conflict_keys {
            let value = values
                .get(*key)
                .cloned()
                .ok_or_else(|| StoreError::rejected(format!("upsert key '{}' missing", key)))?;
            filter = filter.eq(*key, value);
        }

        let existing = self.select(tenant, table, &filter).await?;
        match existing.first() {
            Some(row) => self.update(tenant, table, row.id, values).await,
            None => self.insert(tenant, table, values).await,
        }
    }
}

fn select_query<'a>(tenant: &'a TenantId, table: Table, filter: &'a Filter) -> QueryBuilder<'a, Postgres> {
    let mut query = QueryBuilder::new("SELECT id, data FROM tenant_records WHERE tenant_id = ");
    query.push_bind(tenant.as_str());
    query.push(" AND table_name = ");
    query.push_bind(table.as_str());

    for condition in &filter.conditions {
        query.push(" AND ");
        match condition {
            Condition::Eq { field, value } => {
                query.push("data -> ");
                query.push_bind(field.as_str());
                query.push(" = ");
                query.push_bind(Json(value.clone()));
            }
            Condition::EqIgnoreCase { field, value } => {
                query.push("lower(data ->> ");
                query.push_bind(field.as_str());
                query.push(") = lower(");
                query.push_bind(value.as_str());
                query.push(")");
            }
            Condition::Lte { field, value } => push_ordered(&mut query, field, "<=", value),
            Condition::Gte { field, value } => push_ordered(&mut query, field, ">=", value),
        }
    }

    query.push(" ORDER BY created_at");
    query
}

/// Ordering only holds between values of the same JSON type.
fn push_ordered(query: &mut QueryBuilder<'_, Postgres>, field: &str, op: &str, value: &Value) {
    query.push("jsonb_typeof(data -> ");
    query.push_bind(field.to_string());
    query.push(") = jsonb_typeof(");
    query.push_bind(Json(value.clone()));
    query.push(") AND data -> ");
    query.push_bind(field.to_string());
    query.push(format!(" {} ", op));
    query.push_bind(Json(value.clone()));
}

fn pg_row_to_row(row: &PgRow) -> Result<Row, StoreError> {
    let id: Uuid = row
        .try_get("id")
        .map_err(|e| StoreError::unavailable(format!("decode id: {}", e)))?;
    let Json(values): Json<Map<String, Value>> = row
        .try_get("data")
        .map_err(|e| StoreError::unavailable(format!("decode data: {}", e)))?;
    Ok(Row::new(RowId::from_uuid(id), values))
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db) => StoreError::rejected(db.message().to_string()),
        other => StoreError::unavailable(other.to_string()),
    }
}
