//! HTTP handlers for onboarding endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{ChatRequest, ChatResponse, ConfigResponse, StartResponse};
use crate::adapters::http::cancel::spawn_cancellable;
use crate::adapters::http::error::{ApiError, ErrorResponse};
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::query::PolicyQuery;
use crate::application::handlers::{
    CommitDraftCommand, CommitDraftHandler, GetConfigHandler, GetConfigQuery, SendMessageCommand,
    SendMessageHandler, StartOnboardingCommand, StartOnboardingHandler,
};
use crate::domain::onboarding::SeedContext;

#[derive(Clone)]
pub struct OnboardingHandlers {
    start_handler: Arc<StartOnboardingHandler>,
    send_handler: Arc<SendMessageHandler>,
    config_handler: Arc<GetConfigHandler>,
    commit_handler: Arc<CommitDraftHandler>,
}

impl OnboardingHandlers {
    pub fn new(
        start_handler: Arc<StartOnboardingHandler>,
        send_handler: Arc<SendMessageHandler>,
        config_handler: Arc<GetConfigHandler>,
        commit_handler: Arc<CommitDraftHandler>,
    ) -> Self {
        Self {
            start_handler,
            send_handler,
            config_handler,
            commit_handler,
        }
    }
}

/// POST /api/onboarding/start - Open the dialogue (body: optional seed context)
pub async fn start(
    State(handlers): State<OnboardingHandlers>,
    RequireAuth(actor): RequireAuth,
    body: Bytes,
) -> Response {
    let seed = match seed_from_body(&body) {
        Ok(seed) => seed,
        Err(e) => return e.into_response(),
    };
    let cmd = StartOnboardingCommand {
        actor_id: actor.id,
        seed,
    };

    match handlers.start_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(StartResponse::from(result))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// POST /api/onboarding/chat - Send one message
pub async fn chat(
    State(handlers): State<OnboardingHandlers>,
    RequireAuth(actor): RequireAuth,
    Json(req): Json<ChatRequest>,
) -> Response {
    let cmd = SendMessageCommand {
        actor_id: actor.id,
        message: req.message,
    };

    match handlers.send_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(ChatResponse::from(result))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET /api/onboarding/config - Current draft
pub async fn get_config(
    State(handlers): State<OnboardingHandlers>,
    RequireAuth(actor): RequireAuth,
) -> Response {
    let query = GetConfigQuery { actor_id: actor.id };

    match handlers.config_handler.handle(query).await {
        Ok(result) => (StatusCode::OK, Json(ConfigResponse::from(result))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// POST /api/onboarding/commit?policy= - Import the completed draft
pub async fn commit(
    State(handlers): State<OnboardingHandlers>,
    RequireAuth(actor): RequireAuth,
    Query(params): Query<PolicyQuery>,
) -> Response {
    let policy = match params.policy() {
        Ok(policy) => policy,
        Err(e) => return e.into_response(),
    };
    let cmd = CommitDraftCommand {
        actor_id: actor.id,
        tenant_id: actor.tenant_id,
        policy,
    };

    let handler = handlers.commit_handler.clone();
    let result = spawn_cancellable(move |token| async move {
        handler.handle(cmd, &token).await.map_err(ApiError::from)
    })
    .await;

    match result {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// An empty body or `null` means no seed; anything else must decode.
fn seed_from_body(body: &[u8]) -> Result<SeedContext, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SeedContext::default());
    }
    serde_json::from_slice::<Option<SeedContext>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| {
            ApiError::new(
                StatusCode::BAD_REQUEST,
                ErrorResponse::bad_request(format!("invalid seed context: {}", e)),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_or_null_body_is_an_empty_seed() {
        assert_eq!(seed_from_body(b"").unwrap(), SeedContext::default());
        assert_eq!(seed_from_body(b" \n").unwrap(), SeedContext::default());
        assert_eq!(seed_from_body(b"null").unwrap(), SeedContext::default());
    }

    #[test]
    fn malformed_seed_is_a_bad_request() {
        let bodies: [&[u8]; 3] = [br#"{"clubName": "#, br#""text""#, br#"{"clubName": 42}"#];
        for body in bodies {
            let err = seed_from_body(body).unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
            assert_eq!(err.body.code, "BAD_REQUEST");
        }
    }

    #[test]
    fn well_formed_seed_is_decoded() {
        let seed = seed_from_body(br#"{"clubName": "Lac"}"#).unwrap();
        assert_eq!(seed.club_name.as_deref(), Some("Lac"));
    }
}
