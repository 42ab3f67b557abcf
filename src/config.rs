//! Engine configuration
//!
//! Configuration is plain data loaded from TOML. Every field has a default,
//! so an empty document yields the stock configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StressError;
use crate::types::GeoPoint;

pub const DEFAULT_STATION_RADIUS_KM: f64 = 200.0;
pub const DEFAULT_SERIES_DAYS: u32 = 90;
pub const DEFAULT_SEISMICITY_WINDOW_DAYS: u32 = 30;
pub const DEFAULT_SEISMICITY_MATCH_RADIUS_KM: f64 = 500.0;

/// A jurisdiction-specific advisory applied inside a bounding box
///
/// Rules are checked in table order and only the first containing box applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRule {
    pub name: String,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
    pub advisory: String,
}

impl RegionRule {
    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.latitude)
            && (self.min_lon..=self.max_lon).contains(&point.longitude)
    }
}

/// Built-in region table, evaluated in order; first match wins
pub fn default_region_rules() -> Vec<RegionRule> {
    vec![
        RegionRule {
            name: "india".to_string(),
            min_lat: 6.0,
            max_lat: 38.0,
            min_lon: 68.0,
            max_lon: 98.0,
            advisory: "Ensure construction follows IS 1893 (Part 1) seismic design provisions \
                       for the local seismic zone"
                .to_string(),
        },
        RegionRule {
            name: "japan".to_string(),
            min_lat: 24.0,
            max_lat: 46.0,
            min_lon: 123.0,
            max_lon: 146.0,
            advisory: "Verify buildings meet the Building Standard Law seismic standard \
                       and follow JMA earthquake early warning guidance"
                .to_string(),
        },
        RegionRule {
            name: "california".to_string(),
            min_lat: 32.0,
            max_lat: 42.0,
            min_lon: -125.0,
            max_lon: -114.0,
            advisory: "Review California Building Code seismic provisions and enable \
                       ShakeAlert notifications"
                .to_string(),
        },
    ]
}

fn default_station_radius_km() -> f64 {
    DEFAULT_STATION_RADIUS_KM
}

fn default_series_days() -> u32 {
    DEFAULT_SERIES_DAYS
}

fn default_seismicity_window_days() -> u32 {
    DEFAULT_SEISMICITY_WINDOW_DAYS
}

fn default_seismicity_match_radius_km() -> f64 {
    DEFAULT_SEISMICITY_MATCH_RADIUS_KM
}

/// Engine and gateway configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressConfig {
    /// Ordered region advisories
    #[serde(default = "default_region_rules")]
    pub region_rules: Vec<RegionRule>,
    /// Search radius for monitoring stations
    #[serde(default = "default_station_radius_km")]
    pub station_radius_km: f64,
    /// Days of displacement history requested per station
    #[serde(default = "default_series_days")]
    pub series_days: u32,
    /// Days of seismicity considered by the upstream score
    #[serde(default = "default_seismicity_window_days")]
    pub seismicity_window_days: u32,
    /// Maximum distance between a location and a located seismicity entry
    #[serde(default = "default_seismicity_match_radius_km")]
    pub seismicity_match_radius_km: f64,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            region_rules: default_region_rules(),
            station_radius_km: DEFAULT_STATION_RADIUS_KM,
            series_days: DEFAULT_SERIES_DAYS,
            seismicity_window_days: DEFAULT_SEISMICITY_WINDOW_DAYS,
            seismicity_match_radius_km: DEFAULT_SEISMICITY_MATCH_RADIUS_KM,
        }
    }
}

impl StressConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, StressError> {
        let config: StressConfig =
            toml::from_str(source).map_err(|e| StressError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, StressError> {
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        log::debug!(
            "Loaded configuration from {} ({} region rules)",
            path.display(),
            config.region_rules.len()
        );
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String, StressError> {
        toml::to_string_pretty(self).map_err(|e| StressError::ConfigError(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), StressError> {
        if !(self.station_radius_km > 0.0) {
            return Err(StressError::ConfigError(
                "station_radius_km must be positive".to_string(),
            ));
        }
        if !(self.seismicity_match_radius_km > 0.0) {
            return Err(StressError::ConfigError(
                "seismicity_match_radius_km must be positive".to_string(),
            ));
        }
        if self.series_days == 0 || self.seismicity_window_days == 0 {
            return Err(StressError::ConfigError(
                "series_days and seismicity_window_days must be non-zero".to_string(),
            ));
        }

        for rule in &self.region_rules {
            if rule.min_lat > rule.max_lat || rule.min_lon > rule.max_lon {
                return Err(StressError::ConfigError(format!(
                    "region rule '{}' has an inverted bounding box",
                    rule.name
                )));
            }
            if rule.advisory.trim().is_empty() {
                return Err(StressError::ConfigError(format!(
                    "region rule '{}' has an empty advisory",
                    rule.name
                )));
            }
        }

        Ok(())
    }
}
