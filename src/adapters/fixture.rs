//! File-backed gateway
//!
//! Serves stations, displacement series, and seismicity scores from an
//! in-memory store, optionally loaded from a fixture directory:
//!
//! - `stations.json`: station list (see [`StationAdapter`])
//! - `series/<station_id>.json`: one GNSS payload per station
//! - `seismicity.json`: array of seismicity payloads, each with a `location`

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::seismicity::{convert_payload, SeismicityPayload};
use super::{
    DisplacementSource, GnssSeriesAdapter, SeismicitySource, StationAdapter, StationDirectory,
};
use crate::error::StressError;
use crate::geo::great_circle_distance_km;
use crate::stations::rank_nearby;
use crate::types::{
    DateRange, DisplacementSeries, GeoPoint, NearbyStation, SeismicityStressInput, Station,
};

/// A seismicity score tied to the location it was computed for
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedSeismicity {
    pub location: GeoPoint,
    pub input: SeismicityStressInput,
}

/// In-memory implementation of every gateway trait
#[derive(Debug, Clone)]
pub struct FixtureGateway {
    stations: Vec<Station>,
    series: HashMap<String, DisplacementSeries>,
    seismicity: Vec<LocatedSeismicity>,
    match_radius_km: f64,
}

impl FixtureGateway {
    pub fn new(match_radius_km: f64) -> Self {
        Self {
            stations: Vec::new(),
            series: HashMap::new(),
            seismicity: Vec::new(),
            match_radius_km,
        }
    }

    pub fn with_station(mut self, station: Station) -> Self {
        self.stations.push(station);
        self
    }

    pub fn with_series(mut self, series: DisplacementSeries) -> Self {
        self.series.insert(series.station_id.clone(), series);
        self
    }

    pub fn with_seismicity(mut self, location: GeoPoint, input: SeismicityStressInput) -> Self {
        self.seismicity.push(LocatedSeismicity { location, input });
        self
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Load a fixture directory; missing files leave that part empty
    pub fn load_dir(dir: &Path, match_radius_km: f64) -> Result<Self, StressError> {
        let mut gateway = Self::new(match_radius_km);

        let stations_path = dir.join("stations.json");
        if stations_path.is_file() {
            gateway.stations = StationAdapter::parse(&fs::read_to_string(&stations_path)?)?;
        }

        let series_dir = dir.join("series");
        if series_dir.is_dir() {
            for entry in fs::read_dir(&series_dir)? {
                let path = entry?.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                let series = GnssSeriesAdapter::parse_for_station(&fs::read_to_string(&path)?, stem)?;
                gateway.series.insert(series.station_id.clone(), series);
            }
        }

        let seismicity_path = dir.join("seismicity.json");
        if seismicity_path.is_file() {
            let entries: Vec<LocatedPayload> =
                serde_json::from_str(&fs::read_to_string(&seismicity_path)?)?;
            for entry in entries {
                if !entry.location.is_valid() {
                    return Err(StressError::InvalidLocation(format!(
                        "seismicity entry at ({}, {})",
                        entry.location.latitude, entry.location.longitude
                    )));
                }
                if let Some(input) = convert_payload(entry.payload)? {
                    gateway.seismicity.push(LocatedSeismicity {
                        location: entry.location,
                        input,
                    });
                }
            }
        }

        log::info!(
            "Loaded fixtures from {}: {} stations, {} series, {} seismicity entries",
            dir.display(),
            gateway.stations.len(),
            gateway.series.len(),
            gateway.seismicity.len()
        );
        Ok(gateway)
    }
}

impl DisplacementSource for FixtureGateway {
    fn fetch_series(
        &self,
        station_id: &str,
        range: &DateRange,
    ) -> Result<DisplacementSeries, StressError> {
        let stored = self
            .series
            .get(station_id)
            .ok_or_else(|| StressError::MissingSeries(station_id.to_string()))?;

        let mut series = stored.clone();
        series.samples.retain(|s| range.contains(s.timestamp));
        if series.location.is_none() {
            series.location = self
                .stations
                .iter()
                .find(|s| s.id == station_id)
                .map(|s| s.location);
        }
        Ok(series)
    }
}

impl SeismicitySource for FixtureGateway {
    fn fetch_seismicity(
        &self,
        location: GeoPoint,
        _window: &DateRange,
    ) -> Result<Option<SeismicityStressInput>, StressError> {
        let nearest = self
            .seismicity
            .iter()
            .map(|entry| {
                let distance = great_circle_distance_km(
                    location.latitude,
                    location.longitude,
                    entry.location.latitude,
                    entry.location.longitude,
                );
                (distance, entry)
            })
            .filter(|(distance, _)| *distance <= self.match_radius_km)
            .min_by(|a, b| a.0.total_cmp(&b.0));

        Ok(nearest.map(|(_, entry)| entry.input.clone()))
    }
}

impl StationDirectory for FixtureGateway {
    fn nearby_stations(
        &self,
        location: GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<NearbyStation>, StressError> {
        Ok(rank_nearby(&self.stations, location, radius_km))
    }
}

#[derive(Debug, Deserialize)]
struct LocatedPayload {
    location: GeoPoint,
    #[serde(flatten)]
    payload: SeismicityPayload,
}
