//! HTTP plumbing shared by the hosted model backends: client setup, error
//! classification, and the retry loop around one completion.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::warn;

use crate::ports::AIError;

/// Longest wait honoured from a rate-limit hint.
const MAX_RATE_LIMIT_WAIT_SECS: u32 = 30;

const BASE_BACKOFF_MS: u64 = 500;
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Doubles from 500ms per retry, capped at thirty seconds.
fn backoff(retry: u32) -> Duration {
    let factor = 1u64.checked_shl(retry).unwrap_or(u64::MAX);
    Duration::from_millis(BASE_BACKOFF_MS.saturating_mul(factor)).min(MAX_BACKOFF)
}

pub(super) fn build_client(timeout: Duration) -> Result<Client, AIError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AIError::Client(e.to_string()))
}

pub(super) fn send_error(err: reqwest::Error, timeout: Duration) -> AIError {
    if err.is_timeout() {
        AIError::Timeout {
            timeout_secs: timeout.as_secs() as u32,
        }
    } else if err.is_connect() {
        AIError::network(format!("connection failed: {}", err))
    } else {
        AIError::network(err.to_string())
    }
}

/// Decodes a successful body, or classifies the failure status.
pub(super) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, AIError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, &body));
    }
    response
        .json()
        .await
        .map_err(|e| AIError::malformed(e.to_string()))
}

pub(super) fn status_error(status: StatusCode, body: &str) -> AIError {
    match status.as_u16() {
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::RateLimited {
            retry_after_secs: retry_after(body).unwrap_or(MAX_RATE_LIMIT_WAIT_SECS),
        },
        400 | 404 | 413 | 422 => AIError::Rejected(error_message(body)),
        500..=599 => AIError::unavailable(format!("{}: {}", status, error_message(body))),
        _ => AIError::network(format!("unexpected status {}: {}", status, error_message(body))),
    }
}

/// Both hosted APIs wrap failures as `{"error": {"message": ...}}`.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

/// Seconds from a "try again in Ns" hint.
fn retry_after(body: &str) -> Option<u32> {
    let message = error_message(body);
    let rest = &message[message.find("try again in ")? + "try again in ".len()..];
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Runs `attempt` until it succeeds, fails permanently, or `max_retries`
/// extra attempts are spent. Backoff doubles from 500ms; a rate-limit hint
/// replaces it, capped at 30s.
pub(super) async fn with_retries<T, F, Fut>(
    provider: &str,
    max_retries: u32,
    mut attempt: F,
) -> Result<T, AIError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AIError>>,
{
    let mut retries = 0;
    loop {
        match attempt().await {
            Err(err) if err.is_transient() && retries < max_retries => {
                let backoff = match &err {
                    AIError::RateLimited { retry_after_secs } => Duration::from_secs(
                        u64::from((*retry_after_secs).min(MAX_RATE_LIMIT_WAIT_SECS)),
                    ),
                    _ => backoff(retries),
                };
                retries += 1;
                warn!(
                    provider,
                    retry = retries,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %err,
                    "Model call failed, retrying"
                );
                sleep(backoff).await;
            }
            result => return result,
        }
    }
}
