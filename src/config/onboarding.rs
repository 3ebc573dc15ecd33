//! Onboarding dialogue configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct OnboardingConfig {
    /// Window in which a repeated start replays the previous reply
    #[serde(default = "default_debounce")]
    pub debounce_secs: u64,

    /// Inactivity after which a session is treated as absent
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    /// Period of the background eviction sweep
    #[serde(default = "default_eviction_interval")]
    pub eviction_interval_secs: u64,

    /// Stations offered in the opening turn
    #[serde(default = "default_station_limit")]
    pub station_limit: usize,

    /// Base URL of the station directory; lookups are skipped when unset
    pub stations_base_url: Option<String>,

    #[serde(default = "default_stations_timeout")]
    pub stations_timeout_secs: u64,
}

impl OnboardingConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_secs(self.debounce_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn eviction_interval(&self) -> Duration {
        Duration::from_secs(self.eviction_interval_secs)
    }

    pub fn stations_timeout(&self) -> Duration {
        Duration::from_secs(self.stations_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.session_ttl_secs <= self.debounce_secs {
            return Err(ValidationError::InvalidSessionTtl);
        }
        if self.station_limit == 0 || self.station_limit > 20 {
            return Err(ValidationError::InvalidStationLimit);
        }
        if self.eviction_interval_secs == 0 {
            return Err(ValidationError::MissingRequired("ONBOARDING__EVICTION_INTERVAL_SECS"));
        }
        Ok(())
    }
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            debounce_secs: default_debounce(),
            session_ttl_secs: default_session_ttl(),
            eviction_interval_secs: default_eviction_interval(),
            station_limit: default_station_limit(),
            stations_base_url: None,
            stations_timeout_secs: default_stations_timeout(),
        }
    }
}

fn default_debounce() -> u64 {
    5
}

fn default_session_ttl() -> u64 {
    3600
}

fn default_eviction_interval() -> u64 {
    300
}

fn default_station_limit() -> usize {
    3
}

fn default_stations_timeout() -> u64 {
    5
}
