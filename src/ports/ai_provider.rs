//! Dialogue model port.
//!
//! One blocking round trip per assistant turn: the onboarding system prompt
//! plus the full actor/assistant history go out, plain reply text comes back.
//! Adapters flatten their backend's response shape (content blocks, choices)
//! into [`CompletionResponse::text`] so nothing above this port knows which
//! backend answered.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ActorId;

#[async_trait]
pub trait AIProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    fn provider_info(&self) -> ProviderInfo;
}

/// Everything a backend needs to produce the next assistant turn.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_prompt: String,
    /// Oldest first. Always ends with an actor message.
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    pub fn new(metadata: RequestMetadata, system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            messages: Vec::new(),
            max_tokens: 1024,
            temperature: 0.7,
            metadata,
        }
    }

    pub fn with_history(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    pub fn push(mut self, role: MessageRole, content: impl Into<String>) -> Self {
        self.messages.push(Message::new(role, content));
        self
    }

    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Who spoke. The system prompt travels separately, never as a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// Correlates a provider call with the actor and log lines it belongs to.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    pub actor_id: ActorId,
    pub trace_id: String,
}

impl RequestMetadata {
    pub fn new(actor_id: ActorId, trace_id: impl Into<String>) -> Self {
        Self {
            actor_id,
            trace_id: trace_id.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub text: String,
    pub model: String,
    pub usage: TokenUsage,
    /// The backend stopped at the token limit; a trailing `<config>` block
    /// may be cut off.
    pub truncated: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AIError {
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    /// The backend refused the request itself (prompt too long, bad parameters).
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("malformed reply: {0}")]
    MalformedReply(String),

    #[error("client setup failed: {0}")]
    Client(String),
}

impl AIError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedReply(message.into())
    }

    /// Worth another attempt with the same request.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}
