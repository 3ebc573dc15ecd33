//! Fixed station catalogue, for tests and offline development.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::domain::onboarding::{Coordinates, Station};
use crate::ports::{StationDirectory, StationDirectoryError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryStationDirectory {
    stations: Vec<Station>,
    failing: Arc<AtomicBool>,
    lookups: Arc<AtomicUsize>,
}

impl InMemoryStationDirectory {
    pub fn new(stations: Vec<Station>) -> Self {
        Self {
            stations,
            ..Default::default()
        }
    }

    /// A directory whose every lookup fails.
    pub fn failing() -> Self {
        let directory = Self::default();
        directory.failing.store(true, Ordering::SeqCst);
        directory
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StationDirectory for InMemoryStationDirectory {
    async fn nearby(
        &self,
        _origin: Coordinates,
        _limit: usize,
    ) -> Result<Vec<Station>, StationDirectoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StationDirectoryError::Unavailable("directory offline".into()));
        }
        Ok(self.stations.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_catalogue_and_counts_lookups() {
        let directory = InMemoryStationDirectory::new(vec![Station {
            id: "1".into(),
            name: "Alpha".into(),
            latitude: 45.0,
            longitude: 5.0,
            distance_km: None,
        }]);

        let stations = directory.nearby(Coordinates::new(45.0, 5.0), 3).await.unwrap();

        assert_eq!(stations.len(), 1);
        assert_eq!(directory.lookup_count(), 1);
    }

    #[tokio::test]
    async fn failing_directory_errors() {
        let directory = InMemoryStationDirectory::failing();
        assert!(directory.nearby(Coordinates::new(0.0, 0.0), 3).await.is_err());
    }
}
