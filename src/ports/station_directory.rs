//! Station directory port.
//!
//! Resolves coordinates to nearby reference stations. Callers treat every
//! failure as "no stations"; it never aborts a dialogue.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::onboarding::{Coordinates, Station};

#[derive(Debug, Clone, Error)]
pub enum StationDirectoryError {
    #[error("Station directory unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid directory response: {0}")]
    InvalidResponse(String),

    #[error("Station lookup timed out")]
    Timeout,
}

#[async_trait]
pub trait StationDirectory: Send + Sync {
    /// Stations near `origin`. Ordering and distances are not guaranteed;
    /// callers rank the result themselves. At most `limit` are useful.
    async fn nearby(
        &self,
        origin: Coordinates,
        limit: usize,
    ) -> Result<Vec<Station>, StationDirectoryError>;
}
