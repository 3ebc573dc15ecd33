//! HTTP adapter for the onboarding dialogue.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ChatRequest, ChatResponse, ConfigResponse, StartResponse,
};
pub use handlers::OnboardingHandlers;
pub use routes::onboarding_routes;
