//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod import;
pub mod onboarding;

pub use import::{RunImportCommand, RunImportHandler};
pub use onboarding::{
    CommitDraftCommand, CommitDraftError, CommitDraftHandler, GetConfigHandler, GetConfigQuery,
    GetConfigResult, SendMessageCommand, SendMessageHandler, SendMessageResult,
    StartOnboardingCommand, StartOnboardingHandler, StartOnboardingResult,
};
