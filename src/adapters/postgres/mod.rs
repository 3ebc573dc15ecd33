//! PostgreSQL adapters.
//!
//! - `PostgresRecordStore` - tenant-scoped JSONB rows behind the `RecordStore` port

mod record_store;

pub use record_store::PostgresRecordStore;
