//! Onboarding dialogue command and query handlers.

mod assistant_turn;
mod commit_draft;
mod get_config;
mod send_message;
mod start_onboarding;

pub use commit_draft::{CommitDraftCommand, CommitDraftError, CommitDraftHandler};
pub use get_config::{GetConfigHandler, GetConfigQuery, GetConfigResult};
pub use send_message::{SendMessageCommand, SendMessageHandler, SendMessageResult};
pub use start_onboarding::{StartOnboardingCommand, StartOnboardingHandler, StartOnboardingResult};
