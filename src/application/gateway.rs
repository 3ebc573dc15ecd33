//! Turns the session history into a model request and returns the raw reply.

use std::sync::Arc;

use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::domain::foundation::ActorId;
use crate::domain::onboarding::{Turn, TurnRole};
use crate::ports::{AIError, AIProvider, CompletionRequest, Message, RequestMetadata};

/// Sampling settings applied to every onboarding turn.
#[derive(Debug, Clone, Copy)]
pub struct GenerationSettings {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.7,
        }
    }
}

pub struct ProviderGateway {
    provider: Arc<dyn AIProvider>,
    settings: GenerationSettings,
}

impl ProviderGateway {
    pub fn new(provider: Arc<dyn AIProvider>, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    /// Sends the full history and returns the assistant text unmodified.
    ///
    /// Turn `content` is sent, not `display_text`: the model must see the
    /// blocks it emitted and the station context we injected.
    pub async fn send_turn(
        &self,
        actor_id: &ActorId,
        history: &[Turn],
        system_prompt: &str,
    ) -> Result<String, AIError> {
        let trace_id = Uuid::new_v4().to_string();
        let messages = history
            .iter()
            .map(|turn| match turn.role {
                TurnRole::Actor => Message::user(turn.content.clone()),
                TurnRole::Assistant => Message::assistant(turn.content.clone()),
            })
            .collect();

        let request = CompletionRequest::new(
            RequestMetadata::new(actor_id.clone(), &trace_id),
            system_prompt,
        )
        .with_history(messages)
        .with_sampling(self.settings.max_tokens, self.settings.temperature);

        let info = self.provider.provider_info();
        match self.provider.complete(request).await {
            Ok(response) => {
                if response.truncated {
                    warn!(
                        trace_id = %trace_id,
                        provider = %info.name,
                        max_tokens = self.settings.max_tokens,
                        "Assistant turn hit the token limit"
                    );
                }
                debug!(
                    trace_id = %trace_id,
                    provider = %info.name,
                    model = %response.model,
                    output_tokens = response.usage.output_tokens,
                    "Assistant turn generated"
                );
                Ok(response.text)
            }
            Err(err) => {
                error!(
                    trace_id = %trace_id,
                    provider = %info.name,
                    actor_id = %actor_id,
                    error = %err,
                    "Assistant turn failed"
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::domain::onboarding::extract;
    use crate::ports::MessageRole;

    fn actor() -> ActorId {
        ActorId::new("alice").unwrap()
    }

    #[tokio::test]
    async fn history_is_sent_in_order_with_raw_content() {
        let provider = Arc::new(MockAIProvider::new().with_response("ok"));
        let gateway = ProviderGateway::new(provider.clone(), GenerationSettings::default());
        let reply = "Noted.<config>{\"members\":[]}</config>";
        let history = vec![
            Turn::actor("Hello"),
            Turn::assistant(reply, extract(reply)),
            Turn::actor("Two pilots"),
        ];

        let text = gateway.send_turn(&actor(), &history, "system").await.unwrap();

        assert_eq!(text, "ok");
        let calls = provider.requests();
        let request = &calls[0];
        assert_eq!(request.system_prompt, "system");
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[1].role, MessageRole::Assistant);
        assert_eq!(request.messages[1].content, reply);
        assert_eq!(request.max_tokens, 1024);
    }

    #[tokio::test]
    async fn provider_error_is_returned() {
        let provider = Arc::new(MockAIProvider::new().with_error(AIError::AuthenticationFailed));
        let gateway = ProviderGateway::new(provider, GenerationSettings::default());

        let err = gateway
            .send_turn(&actor(), &[Turn::actor("Hello")], "system")
            .await
            .unwrap_err();

        assert!(matches!(err, AIError::AuthenticationFailed));
    }
}
