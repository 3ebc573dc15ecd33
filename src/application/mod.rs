//! Application layer - Commands, Queries, and Handlers.
//!
//! Orchestrates the onboarding dialogue and the reconciliation pipeline
//! over the ports. Handlers own no state beyond their collaborators.

mod enrichment;
mod gateway;
pub mod handlers;
mod reconciler;
mod session_store;

pub use enrichment::StationEnricher;
pub use gateway::{GenerationSettings, ProviderGateway};
pub use reconciler::Reconciler;
pub use session_store::SessionStore;
