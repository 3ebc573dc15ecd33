//! Static fallback provider.
//!
//! Used when no model credentials are configured. It answers every turn
//! with fixed guidance and never emits a `<config>` block, so the draft
//! only grows through the seed context.

use async_trait::async_trait;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, MessageRole, ProviderInfo,
    TokenUsage,
};

const WELCOME: &str = "Welcome aboard! The onboarding assistant is running without a \
language model, so I can't read your answers yet. You can still review the \
configuration seeded from your club details, and an administrator can finish \
the setup once an assistant is available.";

const FOLLOW_UP: &str = "Thanks. Your message has been kept in the conversation \
history. The assistant is unavailable for now, so no new settings were \
recorded from it.";

#[derive(Debug, Clone, Default)]
pub struct StaticProvider;

impl StaticProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AIProvider for StaticProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let answered = request
            .messages
            .iter()
            .any(|m| m.role == MessageRole::Assistant);

        Ok(CompletionResponse {
            text: if answered { FOLLOW_UP } else { WELCOME }.to_string(),
            model: "static".to_string(),
            usage: TokenUsage::default(),
            truncated: false,
        })
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("static", "static")
    }
}
