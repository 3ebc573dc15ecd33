//! OpenAI Chat Completions backend.
//!
//! The system prompt is sent as a leading `system` message and the first
//! choice's content is the reply.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::transport::{build_client, decode, send_error, with_retries};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo, TokenUsage,
};

#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-2024-08-06".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
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

pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        let client = build_client(config.timeout)?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn body<'a>(&'a self, request: &'a CompletionRequest) -> ChatBody<'a> {
        let system = WireMessage {
            role: "system",
            content: &request.system_prompt,
        };
        let history = request.messages.iter().map(|m| WireMessage {
            role: m.role.as_str(),
            content: &m.content,
        });

        ChatBody {
            model: &self.config.model,
            messages: std::iter::once(system).chain(history).collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    async fn attempt(&self, request: &CompletionRequest) -> Result<CompletionResponse, AIError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&self.body(request))
            .send()
            .await
            .map_err(|e| send_error(e, self.config.timeout))?;

        let reply: ChatReply = decode(response).await?;
        reply.into_completion()
    }
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        with_retries("openai", self.config.max_retries, || self.attempt(&request)).await
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai", &self.config.model)
    }
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    model: &'a str,
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
struct ChatReply {
    model: String,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<ReplyUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReplyUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl ChatReply {
    fn into_completion(self) -> Result<CompletionResponse, AIError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AIError::malformed("reply has no choices"))?;

        Ok(CompletionResponse {
            text: choice.message.content.unwrap_or_default(),
            model: self.model,
            usage: self
                .usage
                .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
                .unwrap_or_default(),
            truncated: choice.finish_reason.as_deref() == Some("length"),
        })
    }
}
