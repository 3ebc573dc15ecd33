//! Anthropic Messages API backend.
//!
//! ```ignore
//! let provider = AnthropicProvider::new(
//!     AnthropicConfig::new(api_key).with_model("claude-sonnet-4-20250514"),
//! )?;
//! ```
//!
//! The system prompt goes in the top-level `system` field; the reply's text
//! blocks are concatenated into one string.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::transport::{build_client, decode, send_error, with_retries};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo, TokenUsage,
};

const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicConfig) -> Result<Self, AIError> {
        let client = build_client(config.timeout)?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    fn body<'a>(&'a self, request: &'a CompletionRequest) -> MessagesBody<'a> {
        MessagesBody {
            model: &self.config.model,
            system: &request.system_prompt,
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    async fn attempt(&self, request: &CompletionRequest) -> Result<CompletionResponse, AIError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", self.config.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .json(&self.body(request))
            .send()
            .await
            .map_err(|e| send_error(e, self.config.timeout))?;

        let reply: MessagesReply = decode(response).await?;
        Ok(reply.into_completion())
    }
}

#[async_trait]
impl AIProvider for AnthropicProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        with_retries("anthropic", self.config.max_retries, || self.attempt(&request)).await
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("anthropic", &self.config.model)
    }
}

#[derive(Debug, Serialize)]
struct MessagesBody<'a> {
    model: &'a str,
    system: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesReply {
    model: String,
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: ReplyUsage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReplyUsage {
    input_tokens: u32,
    output_tokens: u32,
}

impl MessagesReply {
    fn into_completion(self) -> CompletionResponse {
        let text = self
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect::<String>();

        CompletionResponse {
            text,
            model: self.model,
            usage: TokenUsage::new(self.usage.input_tokens, self.usage.output_tokens),
            truncated: self.stop_reason.as_deref() == Some("max_tokens"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ActorId;
    use crate::ports::{MessageRole, RequestMetadata};

    fn provider() -> AnthropicProvider {
        AnthropicProvider::new(AnthropicConfig::new("sk-test")).unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new(
            RequestMetadata::new(ActorId::new("alice").unwrap(), "t-1"),
            "You configure aviation clubs.",
        )
        .push(MessageRole::User, "Bonjour")
        .push(MessageRole::Assistant, "Combien d'avions ?")
        .push(MessageRole::User, "Deux")
    }

    #[test]
    fn system_prompt_is_a_top_level_field() {
        let provider = provider();
        let request = request();
        let body = serde_json::to_value(provider.body(&request)).unwrap();

        assert_eq!(body["system"], "You configure aviation clubs.");
        assert_eq!(body["messages"].as_array().unwrap().len(), 3);
        assert_eq!(body["messages"][1]["role"], "assistant");
        assert_eq!(body["max_tokens"], 1024);
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let provider = AnthropicProvider::new(
            AnthropicConfig::new("k").with_base_url("http://localhost:9000/"),
        )
        .unwrap();
        assert_eq!(provider.endpoint(), "http://localhost:9000/v1/messages");
    }

    #[test]
    fn text_blocks_are_joined() {
        let reply: MessagesReply = serde_json::from_value(serde_json::json!({
            "model": "claude-sonnet-4-20250514",
            "content": [
                {"type": "text", "text": "Parfait. "},
                {"type": "tool_use", "id": "x"},
                {"type": "text", "text": "<config>{}</config>"}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 120, "output_tokens": 14}
        }))
        .unwrap();

        let completion = reply.into_completion();
        assert_eq!(completion.text, "Parfait. <config>{}</config>");
        assert_eq!(completion.usage.output_tokens, 14);
        assert!(!completion.truncated);
    }

    #[test]
    fn max_tokens_stop_marks_truncation() {
        let reply: MessagesReply = serde_json::from_value(serde_json::json!({
            "model": "m",
            "content": [{"type": "text", "text": "<config>{\"members\":"}],
            "stop_reason": "max_tokens",
            "usage": {"input_tokens": 1, "output_tokens": 1024}
        }))
        .unwrap();
        assert!(reply.into_completion().truncated);
    }

    #[test]
    fn info_names_backend_and_model() {
        let info = provider().provider_info();
        assert_eq!(info, ProviderInfo::new("anthropic", "claude-sonnet-4-20250514"));
    }
}
