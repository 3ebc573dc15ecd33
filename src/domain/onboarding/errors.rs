//! Onboarding-specific error types.

use crate::domain::foundation::{ActorId, ErrorCode};

/// Errors surfaced by the onboarding dialogue.
///
/// A malformed fragment is not among them: it is logged and dropped while the
/// dialogue continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnboardingError {
    /// No live session for the actor; they must start again.
    SessionNotFound(ActorId),
    /// The model backend failed this turn. The actor turn stays in history.
    ProviderUnavailable(String),
    /// Bad input from the caller.
    ValidationFailed { field: String, message: String },
    /// Session storage failed.
    Infrastructure(String),
}

impl OnboardingError {
    pub fn session_not_found(actor_id: ActorId) -> Self {
        OnboardingError::SessionNotFound(actor_id)
    }
    pub fn provider_unavailable(message: impl Into<String>) -> Self {
        OnboardingError::ProviderUnavailable(message.into())
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        OnboardingError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        OnboardingError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            OnboardingError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            OnboardingError::ProviderUnavailable(_) => ErrorCode::ProviderUnavailable,
            OnboardingError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            OnboardingError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            OnboardingError::SessionNotFound(actor) => {
                format!("No onboarding session for actor {}", actor)
            }
            OnboardingError::ProviderUnavailable(msg) => {
                format!("Assistant unavailable: {}", msg)
            }
            OnboardingError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            OnboardingError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for OnboardingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for OnboardingError {}
