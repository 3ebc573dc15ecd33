//! Database configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Record store backing.
///
/// Without a URL imported rows live in process memory and vanish on restart.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Create `tenant_records` and its index at startup if missing.
    #[serde(default)]
    pub ensure_schema: bool,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// The connection URL, treating an empty value as unset.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.url().is_some()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = self.url() {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(ValidationError::InvalidDatabaseUrl);
            }
        }
        if self.min_connections > self.max_connections {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.max_connections > 100 {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            min_connections: default_min_connections(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            ensure_schema: false,
        }
    }
}

fn default_min_connections() -> u32 {
    2
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mean_in_memory_records() {
        let config = DatabaseConfig::default();
        assert!(!config.is_configured());
        assert!(!config.ensure_schema);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_url_counts_as_unset() {
        let config = DatabaseConfig {
            url: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(config.url(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_postgres_url_is_rejected() {
        let config = DatabaseConfig {
            url: Some("mysql://localhost/test".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidDatabaseUrl)
        ));
    }

    #[test]
    fn min_above_max_is_rejected() {
        let config = DatabaseConfig {
            url: Some("postgresql://localhost/test".to_string()),
            min_connections: 10,
            max_connections: 5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_pool_is_rejected() {
        let config = DatabaseConfig {
            max_connections: 150,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
