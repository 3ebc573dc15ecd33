//! HTTP station directory.
//!
//! `GET {base_url}/stations?latitude=..&longitude=..` returning a JSON array.
//! Upstream field names vary (`Nom_usuel` / `name`, `Id_station` / `id`,
//! `distance` in km), so the wire shape is decoded leniently and rows
//! without a name or coordinates are dropped. The upstream API has no limit
//! parameter; callers rank and truncate.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::domain::onboarding::{Coordinates, Station};
use crate::ports::{StationDirectory, StationDirectoryError};

#[derive(Debug, Clone)]
pub struct HttpStationDirectory {
    client: Client,
    base_url: String,
}

impl HttpStationDirectory {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StationDirectoryError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StationDirectoryError::Unavailable(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn stations_url(&self) -> String {
        format!("{}/stations", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl StationDirectory for HttpStationDirectory {
    async fn nearby(
        &self,
        origin: Coordinates,
        _limit: usize,
    ) -> Result<Vec<Station>, StationDirectoryError> {
        let response = self
            .client
            .get(self.stations_url())
            .query(&[("latitude", origin.latitude), ("longitude", origin.longitude)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StationDirectoryError::Timeout
                } else {
                    StationDirectoryError::Unavailable(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(StationDirectoryError::Unavailable(format!(
                "status {}",
                response.status()
            )));
        }

        let wire: Vec<WireStation> = response
            .json()
            .await
            .map_err(|e| StationDirectoryError::InvalidResponse(e.to_string()))?;

        let stations = wire.into_iter().filter_map(WireStation::into_station).collect();
        Ok(stations)
    }
}

#[derive(Debug, Deserialize)]
struct WireStation {
    #[serde(alias = "Id_station", alias = "id_station", default)]
    id: Value,
    #[serde(alias = "Nom_usuel", alias = "nom_usuel")]
    name: Option<String>,
    #[serde(alias = "Latitude", alias = "lat")]
    latitude: Option<f64>,
    #[serde(alias = "Longitude", alias = "lon", alias = "lng")]
    longitude: Option<f64>,
    #[serde(alias = "distanceKm", alias = "distance_km")]
    distance: Option<f64>,
}

impl WireStation {
    fn into_station(self) -> Option<Station> {
        let name = self.name.filter(|n| !n.trim().is_empty())?;
        let id = match self.id {
            Value::String(s) if !s.is_empty() => s,
            Value::Number(n) => n.to_string(),
            _ => name.clone(),
        };
        Some(Station {
            id,
            name,
            latitude: self.latitude?,
            longitude: self.longitude?,
            distance_km: self.distance,
        })
    }
}
