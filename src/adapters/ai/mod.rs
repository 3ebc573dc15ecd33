//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port:
//!
//! - `AnthropicProvider` - Anthropic Messages API
//! - `OpenAIProvider` - OpenAI Chat Completions API
//! - `StaticProvider` - Fixed replies when no credentials are configured
//! - `MockAIProvider` - Queued replies for tests
//!
//! [`select_provider`] picks one at startup; there is no failover between
//! providers once the service runs.

mod anthropic_provider;
mod mock_provider;
mod openai_provider;
mod static_provider;
mod transport;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use mock_provider::MockAIProvider;
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
pub use static_provider::StaticProvider;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{AiConfig, AiProvider};
use crate::ports::{AIError, AIProvider as AIProviderPort};

/// Builds the provider for this process: the configured primary when its
/// key is present, else the other keyed provider, else the static one.
pub fn select_provider(config: &AiConfig) -> Result<Arc<dyn AIProviderPort>, AIError> {
    let order = match config.primary_provider {
        AiProvider::Anthropic => [AiProvider::Anthropic, AiProvider::OpenAI],
        AiProvider::OpenAI => [AiProvider::OpenAI, AiProvider::Anthropic],
    };

    for candidate in order {
        let provider: Arc<dyn AIProviderPort> = match candidate {
            AiProvider::Anthropic => match config.anthropic_key() {
                Some(key) => Arc::new(AnthropicProvider::new(
                    AnthropicConfig::new(key)
                        .with_model(&config.anthropic_model)
                        .with_timeout(config.timeout())
                        .with_max_retries(config.max_retries),
                )?),
                None => continue,
            },
            AiProvider::OpenAI => match config.openai_key() {
                Some(key) => Arc::new(OpenAIProvider::new(
                    OpenAIConfig::new(key)
                        .with_model(&config.openai_model)
                        .with_timeout(config.timeout())
                        .with_max_retries(config.max_retries),
                )?),
                None => continue,
            },
        };

        if candidate != config.primary_provider {
            warn!(?candidate, "Primary AI provider has no key, using fallback");
        }
        let info = provider.provider_info();
        info!(provider = %info.name, model = %info.model, "AI provider selected");
        return Ok(provider);
    }

    warn!("No AI provider key configured, using static replies");
    Ok(Arc::new(StaticProvider::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn key(k: &str) -> Option<Secret<String>> {
        Some(Secret::new(k.to_string()))
    }

    #[test]
    fn primary_wins_when_keyed() {
        let config = AiConfig {
            anthropic_api_key: key("sk-ant"),
            openai_api_key: key("sk-oai"),
            ..Default::default()
        };
        assert_eq!(select_provider(&config).unwrap().provider_info().name, "anthropic");
    }

    #[test]
    fn other_provider_when_primary_unkeyed() {
        let config = AiConfig {
            primary_provider: AiProvider::Anthropic,
            openai_api_key: key("sk-oai"),
            ..Default::default()
        };
        let info = select_provider(&config).unwrap().provider_info();
        assert_eq!(info.name, "openai");
        assert_eq!(info.model, "gpt-4o-2024-08-06");
    }

    #[test]
    fn static_when_nothing_keyed() {
        let config = AiConfig {
            anthropic_api_key: key(""),
            ..Default::default()
        };
        assert_eq!(select_provider(&config).unwrap().provider_info().name, "static");
    }
}
