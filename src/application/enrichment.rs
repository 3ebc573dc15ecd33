//! Nearby-station lookup for the opening turn.
//!
//! Never fails: a missing directory, a lookup error, or unusable coordinates
//! all yield an empty list and the dialogue proceeds without stations.

use std::sync::Arc;

use tracing::warn;

use crate::domain::onboarding::{rank_nearest, Coordinates, Station};
use crate::ports::StationDirectory;

pub struct StationEnricher {
    directory: Option<Arc<dyn StationDirectory>>,
    limit: usize,
}

impl StationEnricher {
    pub fn new(directory: Option<Arc<dyn StationDirectory>>, limit: usize) -> Self {
        Self { directory, limit }
    }

    pub fn disabled() -> Self {
        Self::new(None, 0)
    }

    /// Up to `limit` stations, nearest first.
    pub async fn nearby(&self, origin: Option<Coordinates>) -> Vec<Station> {
        let (Some(directory), Some(origin)) = (&self.directory, origin) else {
            return Vec::new();
        };
        if self.limit == 0 || !origin.is_valid() {
            return Vec::new();
        }

        match directory.nearby(origin, self.limit).await {
            Ok(stations) => rank_nearest(stations, origin, self.limit),
            Err(err) => {
                warn!(error = %err, "Station lookup failed, continuing without stations");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stations::InMemoryStationDirectory;

    fn station(id: &str, latitude: f64, longitude: f64) -> Station {
        Station {
            id: id.to_string(),
            name: format!("Station {}", id),
            latitude,
            longitude,
            distance_km: None,
        }
    }

    fn origin() -> Coordinates {
        Coordinates::new(48.0, 2.0)
    }

    #[tokio::test]
    async fn returns_nearest_first_within_limit() {
        let directory = Arc::new(InMemoryStationDirectory::new(vec![
            station("far", 49.0, 2.0),
            station("near", 48.01, 2.0),
            station("mid", 48.5, 2.0),
        ]));
        let enricher = StationEnricher::new(Some(directory), 2);

        let stations = enricher.nearby(Some(origin())).await;

        let ids: Vec<_> = stations.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid"]);
    }

    #[tokio::test]
    async fn failure_yields_empty_list() {
        let enricher = StationEnricher::new(Some(Arc::new(InMemoryStationDirectory::failing())), 3);
        assert!(enricher.nearby(Some(origin())).await.is_empty());
    }

    #[tokio::test]
    async fn no_coordinates_skips_lookup() {
        let directory = Arc::new(InMemoryStationDirectory::new(vec![station("a", 48.0, 2.0)]));
        let enricher = StationEnricher::new(Some(directory.clone()), 3);

        assert!(enricher.nearby(None).await.is_empty());
        assert_eq!(directory.lookup_count(), 0);
    }

    #[tokio::test]
    async fn disabled_enricher_is_empty() {
        assert!(StationEnricher::disabled().nearby(Some(origin())).await.is_empty());
    }
}
