//! AI provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound for `max_retries`.
pub const MAX_RETRIES: u32 = 10;

/// AI provider configuration
///
/// Keys are optional: with neither present the service falls back to a
/// static provider that answers with fixed guidance text.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<Secret<String>>,

    /// Anthropic API key
    pub anthropic_api_key: Option<Secret<String>>,

    /// Provider tried first when its key is present
    #[serde(default = "default_provider")]
    pub primary_provider: AiProvider,

    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Maximum tokens generated per turn
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    OpenAI,
    #[default]
    Anthropic,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Non-empty OpenAI key, if configured
    pub fn openai_key(&self) -> Option<&str> {
        non_empty(&self.openai_api_key)
    }

    /// Non-empty Anthropic key, if configured
    pub fn anthropic_key(&self) -> Option<&str> {
        non_empty(&self.anthropic_api_key)
    }

    pub fn has_openai(&self) -> bool {
        self.openai_key().is_some()
    }

    pub fn has_anthropic(&self) -> bool {
        self.anthropic_key().is_some()
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::MissingRequired("AI__MAX_TOKENS"));
        }
        if self.max_retries > MAX_RETRIES {
            return Err(ValidationError::TooManyRetries);
        }
        Ok(())
    }
}

fn non_empty(key: &Option<Secret<String>>) -> Option<&str> {
    key.as_ref()
        .map(|k| k.expose_secret().as_str())
        .filter(|k| !k.is_empty())
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            primary_provider: default_provider(),
            anthropic_model: default_anthropic_model(),
            openai_model: default_openai_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_provider() -> AiProvider {
    AiProvider::Anthropic
}

fn default_anthropic_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-2024-08-06".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout() -> u64 {
    120
}

fn default_retries() -> u32 {
    3
}
