//! Authentication middleware and extractor for axum.
//!
//! The middleware uses the `SessionValidator` port, so it does not care
//! whether tokens come from the static development list or a mock.
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedActor into extensions
//!                                      ↓
//!                              Handler → RequireAuth extractor reads from extensions
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{AuthError, AuthenticatedActor};
use crate::ports::SessionValidator;

/// Auth middleware state - wraps the session validator.
pub type AuthState = Arc<dyn SessionValidator>;

/// Validates a `Bearer` token and injects the actor into request extensions.
///
/// A request without a token passes through untouched; `RequireAuth` rejects
/// it at the handler. An invalid token is rejected here with 401.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let Some(token) = token else {
        return next.run(request).await;
    };

    match validator.validate(token).await {
        Ok(actor) => {
            request.extensions_mut().insert(actor);
            next.run(request).await
        }
        Err(e) => {
            let (status, message) = match &e {
                AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
                AuthError::ServiceUnavailable(msg) => {
                    tracing::error!(error = %msg, "Token validation backend unavailable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Authentication service unavailable",
                    )
                }
            };

            (
                status,
                Json(serde_json::json!({
                    "code": "AUTH_ERROR",
                    "message": message
                })),
            )
                .into_response()
        }
    }
}

/// Extractor that requires a verified actor.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedActor);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedActor>()
            .cloned()
            .map(RequireAuth)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

#[derive(Debug, Clone)]
pub enum AuthRejection {
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "code": "UNAUTHENTICATED",
                    "message": "Authentication required"
                })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use crate::domain::foundation::{ActorId, TenantId};
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn test_actor() -> AuthenticatedActor {
        AuthenticatedActor::new(
            ActorId::new("actor-123").unwrap(),
            TenantId::new("club-1").unwrap(),
            "admin@club.test",
        )
    }

    fn app(validator: MockSessionValidator) -> Router {
        let validator: AuthState = Arc::new(validator);
        Router::new()
            .route(
                "/whoami",
                get(|RequireAuth(actor): RequireAuth| async move { actor.tenant_id.to_string() }),
            )
            .layer(middleware::from_fn_with_state(validator, auth_middleware))
    }

    fn request(token: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/whoami");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn valid_token_reaches_handler() {
        let app = app(MockSessionValidator::new().with_actor("good", test_actor()));

        let response = app.oneshot(request(Some("good"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"club-1");
    }

    #[tokio::test]
    async fn missing_token_is_rejected_by_extractor() {
        let response = app(MockSessionValidator::new())
            .oneshot(request(None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_token_is_rejected_by_middleware() {
        let response = app(MockSessionValidator::new())
            .oneshot(request(Some("bad")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn validator_outage_is_503() {
        let validator = MockSessionValidator::new()
            .with_error(AuthError::service_unavailable("idp down"));

        let response = app(validator).oneshot(request(Some("any"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn auth_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AuthState>();
        assert_send_sync::<RequireAuth>();
    }
}
