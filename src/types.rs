//! Core types for the Geostress engine
//!
//! This module defines the data that flows through each stage of the engine:
//! raw displacement series, normalized series, geodetic indicators, and the
//! final stress assessment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A WGS84 location in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether the point lies inside the valid latitude/longitude ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Inclusive time range used when requesting data from gateways
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Range covering the `days` days that end at `end`
    pub fn trailing_days(end: DateTime<Utc>, days: u32) -> Self {
        Self {
            start: end - chrono::Duration::days(i64::from(days)),
            end,
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}

/// One time-stamped horizontal displacement measurement for a station
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplacementSample {
    pub timestamp: DateTime<Utc>,
    /// North displacement relative to the station reference epoch (mm)
    pub north: f64,
    /// East displacement relative to the station reference epoch (mm)
    pub east: f64,
}

impl DisplacementSample {
    pub fn new(timestamp: DateTime<Utc>, north: f64, east: f64) -> Self {
        Self {
            timestamp,
            north,
            east,
        }
    }

    /// Horizontal displacement magnitude from the reference epoch (mm)
    pub fn magnitude(&self) -> f64 {
        (self.north * self.north + self.east * self.east).sqrt()
    }
}

/// Descriptive statistics over a displacement series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub sample_count: usize,
    pub first_epoch: Option<DateTime<Utc>>,
    pub last_epoch: Option<DateTime<Utc>>,
    /// Days between first and last sample
    pub span_days: f64,
    /// Straight-line displacement between first and last sample (mm)
    pub net_displacement_mm: f64,
    /// Net displacement divided by span (mm/day), 0 when span is zero
    pub mean_daily_rate_mm: f64,
}

/// Displacement time series for one station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplacementSeries {
    pub station_id: String,
    /// Station position, when the gateway provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    pub samples: Vec<DisplacementSample>,
    /// Gateway-supplied summary; ignored by the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SeriesSummary>,
}

impl DisplacementSeries {
    pub fn new(station_id: impl Into<String>, samples: Vec<DisplacementSample>) -> Self {
        Self {
            station_id: station_id.into(),
            location: None,
            samples,
            summary: None,
        }
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Seismicity-derived stress score supplied by the prediction service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeismicityStressInput {
    /// Conventionally 0-100, higher means more stress
    pub score: f64,
    /// Qualitative level assigned upstream ("Low".."Critical")
    pub label: String,
    /// Recent qualifying events contributing to the score
    pub earthquake_count: u32,
    /// What the score was derived from
    pub basis: String,
    /// Upstream advisories, passed through ahead of the engine's own
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl SeismicityStressInput {
    pub fn new(score: f64, label: impl Into<String>, earthquake_count: u32) -> Self {
        Self {
            score,
            label: label.into(),
            earthquake_count,
            basis: String::new(),
            recommendations: Vec::new(),
        }
    }
}

/// Qualitative label attached to an indicator value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorLevel {
    Low,
    Medium,
    High,
    Critical,
    Increasing,
    Stable,
    Decreasing,
    Unknown,
    /// Upstream-assigned label that does not map onto the variants above
    #[serde(untagged)]
    Label(String),
}

impl IndicatorLevel {
    pub fn as_str(&self) -> &str {
        match self {
            IndicatorLevel::Low => "Low",
            IndicatorLevel::Medium => "Medium",
            IndicatorLevel::High => "High",
            IndicatorLevel::Critical => "Critical",
            IndicatorLevel::Increasing => "Increasing",
            IndicatorLevel::Stable => "Stable",
            IndicatorLevel::Decreasing => "Decreasing",
            IndicatorLevel::Unknown => "Unknown",
            IndicatorLevel::Label(label) => label.as_str(),
        }
    }

    /// Map an upstream label onto a known variant where possible
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => IndicatorLevel::Low,
            "medium" => IndicatorLevel::Medium,
            "high" => IndicatorLevel::High,
            "critical" => IndicatorLevel::Critical,
            "unknown" | "" => IndicatorLevel::Unknown,
            _ => IndicatorLevel::Label(label.to_string()),
        }
    }
}

/// A single indicator in the assessment output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReading {
    pub value: f64,
    pub level: IndicatorLevel,
    pub description: String,
}

/// Raw geodetic indicator values derived from a displacement series
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeodeticIndicators {
    pub strain_rate: f64,
    pub direction_consistency: f64,
    pub acceleration_trend: f64,
    pub stress_buildup: f64,
}

/// Classified indicators keyed by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressIndicators {
    pub strain_rate: IndicatorReading,
    pub direction_consistency: IndicatorReading,
    pub acceleration_trend: IndicatorReading,
    pub stress_buildup: IndicatorReading,
    pub seismic_activity: IndicatorReading,
}

/// Overall stress level of an assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StressLevel {
    Low,
    Moderate,
    Elevated,
    High,
    Critical,
}

impl StressLevel {
    /// Map an overall score onto a level
    pub fn from_score(score: f64) -> Self {
        if score < 20.0 {
            StressLevel::Low
        } else if score < 40.0 {
            StressLevel::Moderate
        } else if score < 60.0 {
            StressLevel::Elevated
        } else if score < 80.0 {
            StressLevel::High
        } else {
            StressLevel::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StressLevel::Low => "Low",
            StressLevel::Moderate => "Moderate",
            StressLevel::Elevated => "Elevated",
            StressLevel::High => "High",
            StressLevel::Critical => "Critical",
        }
    }

    /// Display colour token (CSS named colour)
    pub fn color(&self) -> &'static str {
        match self {
            StressLevel::Low => "green",
            StressLevel::Moderate => "gold",
            StressLevel::Elevated => "orange",
            StressLevel::High => "chocolate",
            StressLevel::Critical => "crimson",
        }
    }
}

/// Overall stress classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStress {
    pub level: StressLevel,
    pub numeric_score: f64,
    pub color_hint: String,
}

/// Which inputs contributed to an assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    GeodeticOnly,
    GeodeticAndSeismicity,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::GeodeticOnly => "geodetic only",
            Provenance::GeodeticAndSeismicity => "geodetic + seismicity",
        }
    }
}

/// Non-fatal input issues detected while assessing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityFlag {
    UnsortedInput,
    DuplicateTimestampsRemoved,
    NonFiniteSamplesDropped,
    InsufficientSamplesForStrainRate,
    InsufficientSamplesForDirection,
    InsufficientSamplesForAcceleration,
    MissingSeismicity,
}

impl QualityFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityFlag::UnsortedInput => "unsorted_input",
            QualityFlag::DuplicateTimestampsRemoved => "duplicate_timestamps_removed",
            QualityFlag::NonFiniteSamplesDropped => "non_finite_samples_dropped",
            QualityFlag::InsufficientSamplesForStrainRate => "insufficient_samples_for_strain_rate",
            QualityFlag::InsufficientSamplesForDirection => "insufficient_samples_for_direction",
            QualityFlag::InsufficientSamplesForAcceleration => {
                "insufficient_samples_for_acceleration"
            }
            QualityFlag::MissingSeismicity => "missing_seismicity",
        }
    }
}

/// Series after ordering, de-duplication, and degraded-input detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSeries {
    pub station_id: String,
    pub location: Option<GeoPoint>,
    pub samples: Vec<DisplacementSample>,
    pub summary: SeriesSummary,
    /// Fraction of the four geodetic indicators that are computable (0-1)
    pub coverage: f64,
    pub quality_flags: Vec<QualityFlag>,
}

/// Engine output for one station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressAssessment {
    pub station_id: String,
    pub overall: OverallStress,
    pub indicators: StressIndicators,
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
    pub provenance: Provenance,
    pub sample_count: usize,
    pub coverage: f64,
    pub quality_flags: Vec<QualityFlag>,
}

/// A geodetic monitoring station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub location: GeoPoint,
}

/// A station paired with its distance from a query location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyStation {
    pub station: Station,
    pub distance_km: f64,
}

/// Tectonic setting of a location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TectonicContext {
    pub plate: Option<String>,
    pub nearest_boundary: Option<String>,
    pub boundary_distance_km: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stress_level_from_score_boundaries() {
        assert_eq!(StressLevel::from_score(0.0), StressLevel::Low);
        assert_eq!(StressLevel::from_score(19.99), StressLevel::Low);
        assert_eq!(StressLevel::from_score(20.0), StressLevel::Moderate);
        assert_eq!(StressLevel::from_score(40.0), StressLevel::Elevated);
        assert_eq!(StressLevel::from_score(60.0), StressLevel::High);
        assert_eq!(StressLevel::from_score(80.0), StressLevel::Critical);
        assert_eq!(StressLevel::from_score(250.0), StressLevel::Critical);
    }

    #[test]
    fn test_stress_level_colors() {
        assert_eq!(StressLevel::Low.color(), "green");
        assert_eq!(StressLevel::Critical.color(), "crimson");
    }

    #[test]
    fn test_indicator_level_from_label() {
        assert_eq!(IndicatorLevel::from_label("HIGH"), IndicatorLevel::High);
        assert_eq!(IndicatorLevel::from_label(""), IndicatorLevel::Unknown);
        assert_eq!(
            IndicatorLevel::from_label("Very High"),
            IndicatorLevel::Label("Very High".to_string())
        );
    }

    #[test]
    fn test_indicator_level_serialization() {
        let json = serde_json::to_string(&IndicatorLevel::Increasing).unwrap();
        assert_eq!(json, "\"Increasing\"");

        let label: IndicatorLevel = serde_json::from_str("\"Severe\"").unwrap();
        assert_eq!(label, IndicatorLevel::Label("Severe".to_string()));
    }

    #[test]
    fn test_geo_point_validity() {
        assert!(GeoPoint::new(28.6, 77.2).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::NAN).is_valid());
    }
}
