//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the onboarding and reconciliation domains.

mod auth;
mod errors;
mod ids;
pub mod patterns;
mod timestamp;

pub use auth::{AuthError, AuthenticatedActor};
pub use errors::{ErrorCode, ValidationError};
pub use ids::{ActorId, RowId, TenantId, TurnId};
pub use timestamp::Timestamp;
