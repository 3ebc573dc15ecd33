//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables carry the `CLUB_ONBOARDING`
//! prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use club_onboarding::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod auth;
mod database;
mod error;
mod import;
mod onboarding;
mod server;

pub use ai::{AiConfig, AiProvider};
pub use auth::{AuthConfig, StaticTokenEntry};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use import::{ImportConfig, PhaseDeadlines};
pub use onboarding::OnboardingConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// development service (in-memory store, static provider).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Language-model providers
    #[serde(default)]
    pub ai: AiConfig,

    /// Dialogue sessions and station enrichment
    #[serde(default)]
    pub onboarding: OnboardingConfig,

    /// Reconciliation importer
    #[serde(default)]
    pub import: ImportConfig,

    /// Optional PostgreSQL backing store
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// - `CLUB_ONBOARDING__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CLUB_ONBOARDING__AI__ANTHROPIC_API_KEY=...` -> `ai.anthropic_api_key`
    ///
    /// A `.env` file is read first when present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CLUB_ONBOARDING")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.onboarding.validate()?;
        self.import.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
