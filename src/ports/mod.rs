//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Language-model backend: submit history, receive text
//! - `SessionRepository` - Per-actor onboarding session storage with expiry
//! - `SessionValidator` - Bearer token to verified actor
//! - `StationDirectory` - Coordinates to nearby reference stations
//! - `RecordStore` - Tenant-scoped row operations on the backing store

mod ai_provider;
mod record_store;
mod session_repository;
mod session_validator;
mod station_directory;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, Message, MessageRole,
    ProviderInfo, RequestMetadata, TokenUsage,
};
pub use record_store::{RecordStore, StoreError};
pub use session_repository::{SessionRepository, SessionRepositoryError};
pub use session_validator::SessionValidator;
pub use station_directory::{StationDirectory, StationDirectoryError};
