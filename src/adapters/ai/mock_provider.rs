//! Scripted provider for tests.
//!
//! Each `complete` call consumes the next scripted outcome and records the
//! request it was given. Once the script runs dry every call answers
//! `"Mock response"`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo, TokenUsage,
};

const MODEL: &str = "mock-model-1";
const FALLBACK_REPLY: &str = "Mock response";

type Scripted = Result<(String, bool), AIError>;

#[derive(Debug, Default)]
struct Script {
    outcomes: VecDeque<Scripted>,
    requests: Vec<CompletionRequest>,
}

/// Clones share one script, so a test can keep a handle after passing the
/// provider into the application.
#[derive(Debug, Clone, Default)]
pub struct MockAIProvider {
    script: Arc<Mutex<Script>>,
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.enqueue(Ok((text.into(), false)))
    }

    /// A reply that hit the token limit.
    pub fn with_truncated_response(self, text: impl Into<String>) -> Self {
        self.enqueue(Ok((text.into(), true)))
    }

    pub fn with_error(self, error: AIError) -> Self {
        self.enqueue(Err(error))
    }

    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// Every request received, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.lock().requests.clone()
    }

    fn enqueue(self, outcome: Scripted) -> Self {
        self.lock().outcomes.push_back(outcome);
        self
    }

    // A test that panicked while holding the lock must not hide later asserts.
    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let outcome = {
            let mut script = self.lock();
            script.requests.push(request);
            script
                .outcomes
                .pop_front()
                .unwrap_or_else(|| Ok((FALLBACK_REPLY.to_string(), false)))
        };

        let (text, truncated) = outcome?;
        Ok(CompletionResponse {
            usage: TokenUsage::new(10, text.len() as u32),
            text,
            model: MODEL.to_string(),
            truncated,
        })
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", MODEL)
    }
}
