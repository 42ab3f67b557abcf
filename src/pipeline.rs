//! Pipeline orchestration
//!
//! This module provides the public API for Geostress.
//! It runs a displacement series through every engine stage:
//!
//! 1. SeriesNormalizer - order, de-duplicate, flag degraded input
//! 2. IndicatorDeriver - compute the four geodetic indicators
//! 3. scoring - fuse with the seismicity score and classify
//! 4. RecommendationEngine - ordered advisories
//! 5. AssessmentEncoder - JSON payload (processor only)
//!
//! [`compute_stress_assessment`] and [`StressEngine`] are pure apart from the
//! `generated_at` stamp. [`StressProcessor`] adds gateway I/O, plate context,
//! and encoding on top.

use std::sync::Arc;
use std::thread;

use chrono::{DateTime, Utc};

use crate::adapters::{
    DisplacementSource, GnssSeriesAdapter, SeismicityAdapter, SeismicitySource, StationDirectory,
};
use crate::config::StressConfig;
use crate::encoder::{AssessmentEncoder, AssessmentPayload};
use crate::error::StressError;
use crate::features::IndicatorDeriver;
use crate::normalizer::SeriesNormalizer;
use crate::plates::PlateCache;
use crate::recommendations::RecommendationEngine;
use crate::scoring::{build_indicators, overall_stress, seismicity_score};
use crate::types::{
    DateRange, DisplacementSeries, GeoPoint, NormalizedSeries, Provenance, QualityFlag,
    SeismicityStressInput, StressAssessment, TectonicContext,
};

/// Assess one station's displacement series with the stock policy.
///
/// Returns `None` when the series is absent or has no usable samples.
///
/// # Example
/// ```ignore
/// let assessment = compute_stress_assessment(Some(&series), seismicity.as_ref());
/// ```
pub fn compute_stress_assessment(
    series: Option<&DisplacementSeries>,
    seismicity: Option<&SeismicityStressInput>,
) -> Option<StressAssessment> {
    StressEngine::default().assess(series, seismicity)
}

/// Assess JSON inputs and return the encoded payload.
///
/// # Arguments
/// * `series_json` - GNSS series payload
/// * `seismicity_json` - Seismicity payload, or `None` when unavailable
pub fn assess_json(series_json: &str, seismicity_json: Option<&str>) -> Result<String, StressError> {
    StressProcessor::default().assess_json(series_json, seismicity_json)
}

/// Pure assessment engine with a configured region policy
#[derive(Debug, Clone)]
pub struct StressEngine {
    recommendations: RecommendationEngine,
}

impl Default for StressEngine {
    fn default() -> Self {
        Self::new(&StressConfig::default())
    }
}

impl StressEngine {
    pub fn new(config: &StressConfig) -> Self {
        Self {
            recommendations: RecommendationEngine::new(config.region_rules.clone()),
        }
    }

    pub fn recommendations(&self) -> &RecommendationEngine {
        &self.recommendations
    }

    pub fn assess(
        &self,
        series: Option<&DisplacementSeries>,
        seismicity: Option<&SeismicityStressInput>,
    ) -> Option<StressAssessment> {
        let normalized = SeriesNormalizer::normalize(series?);
        self.assess_normalized(&normalized, seismicity)
    }

    /// Assess an already-normalized series
    pub fn assess_normalized(
        &self,
        series: &NormalizedSeries,
        seismicity: Option<&SeismicityStressInput>,
    ) -> Option<StressAssessment> {
        if series.samples.is_empty() {
            return None;
        }

        let seismicity = seismicity.filter(|s| {
            if s.score.is_finite() {
                return true;
            }
            log::warn!(
                "Station {}: ignoring non-finite seismicity score {}",
                series.station_id,
                s.score
            );
            false
        });

        let geodetic = IndicatorDeriver::derive(series);
        let overall = overall_stress(&geodetic, seismicity_score(seismicity));
        let indicators = build_indicators(&geodetic, seismicity);
        let recommendations = self
            .recommendations
            .generate(&geodetic, seismicity, series.location);

        let mut quality_flags = series.quality_flags.clone();
        let provenance = if seismicity.is_some() {
            Provenance::GeodeticAndSeismicity
        } else {
            quality_flags.push(QualityFlag::MissingSeismicity);
            Provenance::GeodeticOnly
        };

        log::debug!(
            "Station {}: score={:.2} level={}",
            series.station_id,
            overall.numeric_score,
            overall.level.as_str()
        );

        Some(StressAssessment {
            station_id: series.station_id.clone(),
            overall,
            indicators,
            recommendations,
            generated_at: Utc::now(),
            provenance,
            sample_count: series.samples.len(),
            coverage: series.coverage,
            quality_flags,
        })
    }
}

/// Gateways used by [`StressProcessor`]
#[derive(Clone, Copy)]
pub struct Gateways<'a> {
    pub series: &'a dyn DisplacementSource,
    pub seismicity: &'a dyn SeismicitySource,
    pub stations: &'a dyn StationDirectory,
}

impl<'a> Gateways<'a> {
    /// Use one value for every gateway
    pub fn from_single<G>(gateway: &'a G) -> Self
    where
        G: DisplacementSource + SeismicitySource + StationDirectory,
    {
        Self {
            series: gateway,
            seismicity: gateway,
            stations: gateway,
        }
    }
}

/// Processor combining the engine with gateways, plate context, and encoding.
///
/// Holds no per-request state; one instance may serve many requests.
pub struct StressProcessor {
    config: StressConfig,
    engine: StressEngine,
    encoder: AssessmentEncoder,
    plates: Option<Arc<PlateCache>>,
}

impl Default for StressProcessor {
    fn default() -> Self {
        Self::new(StressConfig::default())
    }
}

impl StressProcessor {
    pub fn new(config: StressConfig) -> Self {
        Self {
            engine: StressEngine::new(&config),
            encoder: AssessmentEncoder::new(),
            plates: None,
            config,
        }
    }

    /// Attach a shared plate geometry cache
    pub fn with_plates(mut self, plates: Arc<PlateCache>) -> Self {
        self.plates = Some(plates);
        self
    }

    pub fn with_encoder(mut self, encoder: AssessmentEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn config(&self) -> &StressConfig {
        &self.config
    }

    pub fn engine(&self) -> &StressEngine {
        &self.engine
    }

    /// Assess a station, fetching series and seismicity concurrently.
    ///
    /// A seismicity failure degrades to "geodetic only". A series failure or
    /// an empty series means no assessment is available.
    pub fn assess_station(
        &self,
        gateways: Gateways<'_>,
        station_id: &str,
        location: GeoPoint,
        now: DateTime<Utc>,
    ) -> Result<AssessmentPayload, StressError> {
        let series_range = DateRange::trailing_days(now, self.config.series_days);
        let seismicity_window = DateRange::trailing_days(now, self.config.seismicity_window_days);

        let (series_result, seismicity_result) = thread::scope(|scope| {
            let seismicity_handle = scope
                .spawn(|| gateways.seismicity.fetch_seismicity(location, &seismicity_window));
            let series_result = gateways.series.fetch_series(station_id, &series_range);
            let seismicity_result = seismicity_handle.join().unwrap_or_else(|_| {
                Err(StressError::Gateway("seismicity fetch panicked".to_string()))
            });
            (series_result, seismicity_result)
        });

        let seismicity = match seismicity_result {
            Ok(input) => input,
            Err(e) => {
                log::warn!("Seismicity unavailable for {station_id}, assessing geodetic only: {e}");
                None
            }
        };

        let mut series = match series_result {
            Ok(series) => series,
            Err(e @ StressError::MissingSeries(_)) => return Err(e),
            Err(e) => {
                log::warn!("Series fetch failed for {station_id}: {e}");
                return Err(StressError::Gateway(format!("series for {station_id}: {e}")));
            }
        };
        if series.location.is_none() {
            series.location = Some(location);
        }

        self.assess_series(&series, seismicity.as_ref(), Some(location))
    }

    /// Assess the nearest station to `location` that has data
    pub fn assess_location(
        &self,
        gateways: Gateways<'_>,
        location: GeoPoint,
        now: DateTime<Utc>,
    ) -> Result<AssessmentPayload, StressError> {
        if !location.is_valid() {
            return Err(StressError::InvalidLocation(format!(
                "({}, {})",
                location.latitude, location.longitude
            )));
        }

        let nearby = gateways
            .stations
            .nearby_stations(location, self.config.station_radius_km)?;

        for candidate in &nearby {
            log::debug!(
                "Trying station {} at {:.1} km",
                candidate.station.id,
                candidate.distance_km
            );
            match self.assess_station(gateways, &candidate.station.id, location, now) {
                Err(StressError::MissingSeries(_)) => continue,
                result => return result,
            }
        }

        Err(StressError::MissingSeries(format!(
            "near ({}, {}) within {} km",
            location.latitude, location.longitude, self.config.station_radius_km
        )))
    }

    /// Assess JSON inputs and return the encoded payload
    pub fn assess_json(
        &self,
        series_json: &str,
        seismicity_json: Option<&str>,
    ) -> Result<String, StressError> {
        let series = GnssSeriesAdapter::parse(series_json)?;
        let seismicity = match seismicity_json {
            Some(raw) => SeismicityAdapter::parse(raw)?,
            None => None,
        };

        let payload = self.assess_series(&series, seismicity.as_ref(), series.location)?;
        serde_json::to_string(&payload).map_err(|e| StressError::EncodingError(e.to_string()))
    }

    /// Assess and encode a series already in memory
    pub fn assess_series(
        &self,
        series: &DisplacementSeries,
        seismicity: Option<&SeismicityStressInput>,
        context_location: Option<GeoPoint>,
    ) -> Result<AssessmentPayload, StressError> {
        let normalized = SeriesNormalizer::normalize(series);
        let assessment = self
            .engine
            .assess_normalized(&normalized, seismicity)
            .ok_or_else(|| StressError::MissingSeries(series.station_id.clone()))?;

        let tectonic = context_location.and_then(|point| self.tectonic_context(point));
        Ok(self.encoder.encode(&assessment, &normalized, tectonic))
    }

    fn tectonic_context(&self, point: GeoPoint) -> Option<TectonicContext> {
        let plates = self.plates.as_ref()?;
        match plates.tectonic_context(point) {
            Ok(context) => Some(context),
            Err(e) => {
                log::warn!("Plate context unavailable: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FixtureGateway;
    use crate::recommendations::{
        CONTINUE_MONITORING, ENHANCED_MONITORING, EXPERT_CONSULTATION, INCREASE_OBSERVATION,
        NORMAL_CONDITIONS,
    };
    use crate::types::{DisplacementSample, IndicatorLevel, Station, StressLevel};
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    fn series_from(station_id: &str, points: impl Iterator<Item = (f64, f64)>) -> DisplacementSeries {
        let samples = points
            .enumerate()
            .map(|(i, (north, east))| {
                DisplacementSample::new(start() + Duration::days(i as i64), north, east)
            })
            .collect();
        DisplacementSeries::new(station_id, samples)
    }

    fn flat_series(n: usize) -> DisplacementSeries {
        series_from("FLAT", std::iter::repeat((0.0, 0.0)).take(n))
    }

    fn northward_series(n: usize) -> DisplacementSeries {
        series_from("NORTH", (0..n).map(|i| (i as f64, 0.0)))
    }

    fn without_timestamp(mut assessment: StressAssessment) -> StressAssessment {
        assessment.generated_at = start();
        assessment
    }

    #[test]
    fn test_stationary_series_is_low() {
        let assessment = compute_stress_assessment(Some(&flat_series(20)), None).unwrap();

        assert_eq!(assessment.indicators.strain_rate.value, 0.0);
        assert_eq!(assessment.indicators.direction_consistency.value, 0.0);
        assert_eq!(assessment.indicators.acceleration_trend.value, 0.0);
        assert_eq!(assessment.indicators.stress_buildup.value, 0.0);
        assert_eq!(assessment.overall.numeric_score, 0.0);
        assert_eq!(assessment.overall.level, StressLevel::Low);
        assert_eq!(assessment.overall.color_hint, "green");
        assert_eq!(
            assessment.recommendations,
            vec![NORMAL_CONDITIONS.to_string(), CONTINUE_MONITORING.to_string()]
        );
        assert_eq!(assessment.provenance, Provenance::GeodeticOnly);
        assert_eq!(assessment.quality_flags, vec![QualityFlag::MissingSeismicity]);
        assert_eq!(assessment.indicators.seismic_activity.level, IndicatorLevel::Unknown);
    }

    #[test]
    fn test_steady_northward_motion() {
        let assessment = compute_stress_assessment(Some(&northward_series(20)), None).unwrap();
        let indicators = &assessment.indicators;

        assert!((indicators.strain_rate.value - 1.0).abs() < 1e-9);
        assert_eq!(indicators.strain_rate.level, IndicatorLevel::High);
        assert!((indicators.direction_consistency.value - 1.0).abs() < 1e-9);
        assert!(indicators.acceleration_trend.value.abs() < 1e-9);
        assert_eq!(indicators.acceleration_trend.level, IndicatorLevel::Stable);
        assert!((indicators.stress_buildup.value - 0.095).abs() < 1e-9);

        assert!((assessment.overall.numeric_score - 20.0).abs() < 1e-9);
        assert_eq!(assessment.overall.level, StressLevel::Moderate);
        assert_eq!(assessment.recommendations, vec![INCREASE_OBSERVATION.to_string()]);
        assert_eq!(assessment.coverage, 1.0);
    }

    #[test]
    fn test_high_seismicity_is_critical() {
        let seismicity = SeismicityStressInput::new(90.0, "Critical", 8);
        let assessment =
            compute_stress_assessment(Some(&flat_series(20)), Some(&seismicity)).unwrap();

        assert_eq!(assessment.overall.numeric_score, 90.0);
        assert_eq!(assessment.overall.level, StressLevel::Critical);
        assert_eq!(assessment.provenance, Provenance::GeodeticAndSeismicity);
        assert!(assessment.quality_flags.is_empty());
        assert_eq!(assessment.indicators.seismic_activity.value, 90.0);
        assert_eq!(
            assessment.indicators.seismic_activity.description,
            "Based on 8 recent earthquakes"
        );

        assert!(assessment.recommendations.contains(&ENHANCED_MONITORING.to_string()));
        assert!(!assessment.recommendations.contains(&EXPERT_CONSULTATION.to_string()));
        assert!(assessment
            .recommendations
            .iter()
            .any(|r| r.starts_with("8 recent earthquakes")));
    }

    #[test]
    fn test_no_data_sentinel() {
        assert!(compute_stress_assessment(None, None).is_none());
        assert!(compute_stress_assessment(Some(&flat_series(0)), None).is_none());

        let seismicity = SeismicityStressInput::new(50.0, "High", 2);
        assert!(compute_stress_assessment(None, Some(&seismicity)).is_none());

        let all_nan = series_from("NAN", std::iter::repeat((f64::NAN, 0.0)).take(5));
        assert!(compute_stress_assessment(Some(&all_nan), None).is_none());
    }

    #[test]
    fn test_short_series_fallbacks() {
        for n in 1..=4 {
            let a = compute_stress_assessment(Some(&northward_series(n)), None).unwrap();
            assert_eq!(a.indicators.direction_consistency.value, 0.0);
        }
        // With exactly 10 samples there is no older window to compare against
        for n in 1..=10 {
            let a = compute_stress_assessment(Some(&northward_series(n)), None).unwrap();
            assert_eq!(a.indicators.strain_rate.value, 0.0);
            assert!(a
                .quality_flags
                .contains(&QualityFlag::InsufficientSamplesForStrainRate));
        }
        for n in 1..=14 {
            let a = compute_stress_assessment(Some(&northward_series(n)), None).unwrap();
            assert_eq!(a.indicators.acceleration_trend.value, 0.0);
        }

        let single = compute_stress_assessment(Some(&northward_series(1)), None).unwrap();
        assert_eq!(single.coverage, 0.25);
    }

    #[test]
    fn test_non_finite_seismicity_is_ignored() {
        for score in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let seismicity = SeismicityStressInput::new(score, "Low", 3);
            let assessment =
                compute_stress_assessment(Some(&flat_series(20)), Some(&seismicity)).unwrap();

            assert_eq!(assessment.overall.numeric_score, 0.0);
            assert_eq!(assessment.overall.level, StressLevel::Low);
            assert_eq!(assessment.provenance, Provenance::GeodeticOnly);
            assert!(assessment
                .quality_flags
                .contains(&QualityFlag::MissingSeismicity));
            assert_eq!(assessment.indicators.seismic_activity.value, 0.0);
            assert_eq!(
                assessment.recommendations,
                compute_stress_assessment(Some(&flat_series(20)), None)
                    .unwrap()
                    .recommendations
            );
        }
    }

    #[test]
    fn test_recommendations_never_empty() {
        let seismicity = SeismicityStressInput::new(10.0, "Low", 0);
        for n in [1, 5, 10, 15, 40] {
            for input in [None, Some(&seismicity)] {
                let a = compute_stress_assessment(Some(&northward_series(n)), input).unwrap();
                assert!(!a.recommendations.is_empty());
            }
        }
    }

    #[test]
    fn test_repeatable_apart_from_timestamp() {
        let series = northward_series(30);
        let seismicity = SeismicityStressInput::new(45.0, "Medium", 6);

        let first = compute_stress_assessment(Some(&series), Some(&seismicity)).unwrap();
        let second = compute_stress_assessment(Some(&series), Some(&seismicity)).unwrap();
        assert_eq!(without_timestamp(first), without_timestamp(second));
    }

    #[test]
    fn test_unsorted_input_matches_sorted() {
        let sorted = northward_series(20);
        let mut shuffled = sorted.clone();
        shuffled.samples.reverse();

        let a = compute_stress_assessment(Some(&sorted), None).unwrap();
        let b = compute_stress_assessment(Some(&shuffled), None).unwrap();

        assert_eq!(a.overall, b.overall);
        assert_eq!(a.indicators, b.indicators);
        assert!(b.quality_flags.contains(&QualityFlag::UnsortedInput));
    }

    #[test]
    fn test_region_advisory_from_series_location() {
        let series = flat_series(20).with_location(GeoPoint::new(35.68, 139.69));
        let assessment = compute_stress_assessment(Some(&series), None).unwrap();

        assert_eq!(assessment.recommendations.len(), 1);
        assert!(assessment.recommendations[0].contains("JMA"));
    }

    #[test]
    fn test_engine_without_region_rules() {
        let config = StressConfig {
            region_rules: Vec::new(),
            ..StressConfig::default()
        };
        let series = flat_series(20).with_location(GeoPoint::new(35.68, 139.69));
        let assessment = StressEngine::new(&config).assess(Some(&series), None).unwrap();
        assert_eq!(assessment.recommendations[0], NORMAL_CONDITIONS);
    }

    fn fixture(now: DateTime<Utc>) -> FixtureGateway {
        let samples = (0..40)
            .map(|i| DisplacementSample::new(now - Duration::days(39 - i), i as f64 * 0.5, 0.0))
            .collect();
        FixtureGateway::new(500.0)
            .with_station(Station {
                id: "LCK4".to_string(),
                name: None,
                location: GeoPoint::new(26.91, 80.96),
            })
            .with_station(Station {
                id: "EMPTY".to_string(),
                name: None,
                location: GeoPoint::new(26.85, 80.95),
            })
            .with_series(DisplacementSeries::new("LCK4", samples))
            .with_seismicity(
                GeoPoint::new(26.8, 80.9),
                SeismicityStressInput::new(65.0, "High", 4),
            )
    }

    #[test]
    fn test_assess_station_with_fixture() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let gateway = fixture(now);
        let processor = StressProcessor::default();

        let payload = processor
            .assess_station(
                Gateways::from_single(&gateway),
                "LCK4",
                GeoPoint::new(26.91, 80.96),
                now,
            )
            .unwrap();

        assert_eq!(payload.assessment.station_id, "LCK4");
        assert_eq!(payload.assessment.provenance, Provenance::GeodeticAndSeismicity);
        assert_eq!(payload.assessment.sample_count, 40);
        assert!(payload
            .assessment
            .recommendations
            .contains(&ENHANCED_MONITORING.to_string()));
        // Lucknow falls inside the South Asia region box
        assert!(payload
            .assessment
            .recommendations
            .iter()
            .any(|r| r.contains("IS 1893")));
        assert!(payload.tectonic.is_none());
    }

    struct FailingSeismicity;

    impl SeismicitySource for FailingSeismicity {
        fn fetch_seismicity(
            &self,
            _location: GeoPoint,
            _window: &DateRange,
        ) -> Result<Option<SeismicityStressInput>, StressError> {
            Err(StressError::Gateway("service unavailable".to_string()))
        }
    }

    #[test]
    fn test_seismicity_failure_degrades_to_geodetic_only() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let gateway = fixture(now);
        let gateways = Gateways {
            series: &gateway,
            seismicity: &FailingSeismicity,
            stations: &gateway,
        };

        let payload = StressProcessor::default()
            .assess_station(gateways, "LCK4", GeoPoint::new(26.91, 80.96), now)
            .unwrap();

        assert_eq!(payload.assessment.provenance, Provenance::GeodeticOnly);
        assert!(payload
            .assessment
            .quality_flags
            .contains(&QualityFlag::MissingSeismicity));
        assert_eq!(payload.provenance.inputs, "geodetic only");
    }

    #[test]
    fn test_missing_series_is_an_error() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let gateway = fixture(now);
        let result = StressProcessor::default().assess_station(
            Gateways::from_single(&gateway),
            "EMPTY",
            GeoPoint::new(26.85, 80.95),
            now,
        );
        assert!(matches!(result, Err(StressError::MissingSeries(_))));
    }

    #[test]
    fn test_series_outside_window_is_missing() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let gateway = fixture(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        let result = StressProcessor::default().assess_station(
            Gateways::from_single(&gateway),
            "LCK4",
            GeoPoint::new(26.91, 80.96),
            now,
        );
        assert!(matches!(result, Err(StressError::MissingSeries(_))));
    }

    #[test]
    fn test_assess_location_skips_stations_without_data() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let gateway = fixture(now);

        // EMPTY is nearer but has no series
        let payload = StressProcessor::default()
            .assess_location(Gateways::from_single(&gateway), GeoPoint::new(26.85, 80.95), now)
            .unwrap();
        assert_eq!(payload.assessment.station_id, "LCK4");

        let far = StressProcessor::default().assess_location(
            Gateways::from_single(&gateway),
            GeoPoint::new(-33.9, 18.4),
            now,
        );
        assert!(matches!(far, Err(StressError::MissingSeries(_))));

        let invalid = StressProcessor::default().assess_location(
            Gateways::from_single(&gateway),
            GeoPoint::new(100.0, 0.0),
            now,
        );
        assert!(matches!(invalid, Err(StressError::InvalidLocation(_))));
    }

    #[test]
    fn test_assess_with_plate_context() {
        let plates = Arc::new(PlateCache::from_geojson_str(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {"name": "Indian"},
                 "geometry": {"type": "Polygon",
                              "coordinates": [[[60.0, 0.0], [95.0, 0.0], [95.0, 30.0], [60.0, 30.0], [60.0, 0.0]]]}}
            ]}"#,
        ));
        let processor = StressProcessor::default().with_plates(Arc::clone(&plates));
        let series = northward_series(20).with_location(GeoPoint::new(26.91, 80.96));

        let payload = processor.assess_series(&series, None, series.location).unwrap();
        let tectonic = payload.tectonic.unwrap();

        assert_eq!(tectonic.plate.as_deref(), Some("Indian"));
        assert!(tectonic.nearest_boundary.is_none());
        assert!(plates.is_loaded());
    }

    #[test]
    fn test_assess_json() {
        let series_json = r#"{
            "station_id": "P123",
            "samples": [
                {"date": "2024-01-01", "north": 0.0, "east": 0.0},
                {"date": "2024-01-02", "north": 0.1, "east": 0.0},
                {"date": "2024-01-03", "north": 0.2, "east": 0.0}
            ]
        }"#;
        let seismicity_json = r#"{"score": 70.0, "label": "High", "earthquake_count": 6}"#;

        let json = assess_json(series_json, Some(seismicity_json)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["assessment"]["station_id"], "P123");
        assert_eq!(value["assessment"]["overall"]["level"], "High");
        assert_eq!(value["provenance"]["inputs"], "geodetic + seismicity");
        assert_eq!(value["quality"]["sample_count"], 3);
    }

    #[test]
    fn test_assess_json_empty_series() {
        let result = assess_json(r#"{"station_id": "P123", "samples": []}"#, None);
        assert!(matches!(result, Err(StressError::MissingSeries(_))));
    }

    #[test]
    fn test_assess_json_invalid() {
        assert!(matches!(assess_json("not json", None), Err(StressError::JsonError(_))));
    }
}
