//! Station directory adapter
//!
//! Parses a station list: `[{ "id": "IISC", "name": "Bengaluru", "latitude": 13.02, "longitude": 77.57 }]`.
//! A `{ "stations": [...] }` wrapper is accepted as well.

use serde::Deserialize;

use crate::error::StressError;
use crate::types::{GeoPoint, Station};

/// Station list adapter
pub struct StationAdapter;

impl StationAdapter {
    pub fn parse(raw_json: &str) -> Result<Vec<Station>, StressError> {
        let payload: StationPayload = serde_json::from_str(raw_json)?;
        let raw_stations = match payload {
            StationPayload::List(list) => list,
            StationPayload::Wrapped { stations } => stations,
        };

        let mut stations = Vec::with_capacity(raw_stations.len());
        for raw in raw_stations {
            let location = GeoPoint::new(raw.latitude, raw.longitude);
            if !location.is_valid() {
                return Err(StressError::InvalidLocation(format!(
                    "station {} at ({}, {})",
                    raw.id, raw.latitude, raw.longitude
                )));
            }
            if stations.iter().any(|s: &Station| s.id == raw.id) {
                log::warn!("Duplicate station id '{}' ignored", raw.id);
                continue;
            }
            stations.push(Station {
                id: raw.id,
                name: raw.name,
                location,
            });
        }
        Ok(stations)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StationPayload {
    List(Vec<RawStation>),
    Wrapped { stations: Vec<RawStation> },
}

#[derive(Debug, Deserialize)]
struct RawStation {
    #[serde(alias = "station_id")]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lon")]
    longitude: f64,
}
