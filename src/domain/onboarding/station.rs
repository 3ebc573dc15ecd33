//! Reference stations offered as context on the first turn.

use serde::{Deserialize, Serialize};

use super::draft::Coordinates;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A station returned by the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl Station {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Great-circle distance in kilometres.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Fills missing distances, sorts ascending and keeps the first `limit`.
pub fn rank_nearest(mut stations: Vec<Station>, origin: Coordinates, limit: usize) -> Vec<Station> {
    for station in &mut stations {
        if station.distance_km.is_none() {
            station.distance_km = Some(haversine_km(origin, station.coordinates()));
        }
    }
    stations.sort_by(|a, b| {
        let da = a.distance_km.unwrap_or(f64::INFINITY);
        let db = b.distance_km.unwrap_or(f64::INFINITY);
        da.total_cmp(&db)
    });
    stations.truncate(limit);
    stations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: &str, lat: f64, lon: f64) -> Station {
        Station {
            id: id.to_string(),
            name: format!("Station {}", id),
            latitude: lat,
            longitude: lon,
            distance_km: None,
        }
    }

    #[test]
    fn haversine_paris_lyon_is_about_392_km() {
        let paris = Coordinates::new(48.8566, 2.3522);
        let lyon = Coordinates::new(45.7640, 4.8357);
        let d = haversine_km(paris, lyon);
        assert!((d - 392.0).abs() < 5.0, "got {}", d);
    }

    #[test]
    fn rank_nearest_orders_and_bounds() {
        let origin = Coordinates::new(45.0, 6.0);
        let ranked = rank_nearest(
            vec![
                station("far", 48.0, 2.0),
                station("near", 45.01, 6.01),
                station("mid", 45.5, 6.5),
                station("farther", 50.0, 0.0),
            ],
            origin,
            3,
        );

        let ids: Vec<_> = ranked.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        assert!(ranked.iter().all(|s| s.distance_km.is_some()));
    }

    #[test]
    fn provided_distance_is_kept() {
        let mut s = station("given", 0.0, 0.0);
        s.distance_km = Some(1.5);
        let ranked = rank_nearest(vec![s], Coordinates::new(45.0, 6.0), 3);
        assert_eq!(ranked[0].distance_km, Some(1.5));
    }
}
