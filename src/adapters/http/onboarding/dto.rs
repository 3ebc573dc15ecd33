//! HTTP DTOs for onboarding endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{GetConfigResult, SendMessageResult, StartOnboardingResult};
use crate::domain::onboarding::{ClubConfigDraft, OnboardingStep};

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub turn_id: String,
    pub display_text: String,
}

impl From<StartOnboardingResult> for StartResponse {
    fn from(result: StartOnboardingResult) -> Self {
        Self {
            turn_id: result.turn_id.to_string(),
            display_text: result.display_text,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub turn_id: String,
    pub display_text: String,
    pub draft: ClubConfigDraft,
    pub complete: bool,
}

impl From<SendMessageResult> for ChatResponse {
    fn from(result: SendMessageResult) -> Self {
        Self {
            turn_id: result.turn_id.to_string(),
            display_text: result.display_text,
            draft: result.draft,
            complete: result.complete,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub draft: ClubConfigDraft,
    pub step: OnboardingStep,
    pub complete: bool,
}

impl From<GetConfigResult> for ConfigResponse {
    fn from(result: GetConfigResult) -> Self {
        Self {
            draft: result.draft,
            step: result.step,
            complete: result.complete,
        }
    }
}
