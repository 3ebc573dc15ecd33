//! In-process storage adapters.
//!
//! - `InMemorySessionRepository` - onboarding sessions with TTL expiry
//! - `InMemoryRecordStore` - tenant-scoped rows for development and tests

mod in_memory_record_store;
mod in_memory_session_repository;

pub use in_memory_record_store::InMemoryRecordStore;
pub use in_memory_session_repository::InMemorySessionRepository;
