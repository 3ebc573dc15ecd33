use thiserror::Error;

/// Startup failure: the sources could not be merged, or the merged values
/// are unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    ValidationFailed(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingRequired(&'static str),

    #[error("server.port must be non-zero")]
    InvalidPort,

    #[error("timeout out of range")]
    InvalidTimeout,

    #[error("server.host {0:?} does not form a socket address")]
    InvalidHost(String),

    #[error("database.url must start with postgres:// or postgresql://")]
    InvalidDatabaseUrl,

    #[error("database.min_connections exceeds database.max_connections")]
    InvalidPoolSize,

    #[error("database.max_connections is capped at 100")]
    PoolSizeTooLarge,

    #[error("ai.temperature must lie in [0.0, 1.0]")]
    InvalidTemperature,

    #[error("ai.max_retries is capped at 10")]
    TooManyRetries,

    #[error("onboarding.station_limit must be between 1 and 20")]
    InvalidStationLimit,

    #[error("onboarding.session_ttl_secs must exceed the start debounce window")]
    InvalidSessionTtl,

    #[error("import deadline {0} must be positive")]
    InvalidDeadline(&'static str),

    #[error("malformed static token entry {0:?}")]
    InvalidStaticToken(String),
}
