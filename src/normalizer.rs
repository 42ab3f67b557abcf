//! Series normalization
//!
//! This module prepares a raw displacement series for indicator derivation.
//! - Samples ordered by timestamp, duplicate timestamps removed
//! - Non-finite samples dropped
//! - Degraded-input flags for indicators lacking history
//! - Coverage and summary statistics computed

use crate::features::{ACCELERATION_MIN_SAMPLES, DIRECTION_MIN_SAMPLES, STRAIN_WINDOW};
use crate::types::{
    DisplacementSample, DisplacementSeries, NormalizedSeries, QualityFlag, SeriesSummary,
};

/// Normalizer for converting raw series into normalized series
pub struct SeriesNormalizer;

impl SeriesNormalizer {
    /// Normalize a displacement series
    pub fn normalize(series: &DisplacementSeries) -> NormalizedSeries {
        let mut quality_flags = Vec::new();

        let mut samples: Vec<DisplacementSample> = series
            .samples
            .iter()
            .filter(|s| s.north.is_finite() && s.east.is_finite())
            .copied()
            .collect();
        if samples.len() != series.samples.len() {
            log::warn!(
                "Station {}: dropped {} non-finite samples",
                series.station_id,
                series.samples.len() - samples.len()
            );
            quality_flags.push(QualityFlag::NonFiniteSamplesDropped);
        }

        if !samples.windows(2).all(|w| w[0].timestamp <= w[1].timestamp) {
            quality_flags.push(QualityFlag::UnsortedInput);
            // Stable sort keeps the first occurrence ahead of later duplicates
            samples.sort_by_key(|s| s.timestamp);
        }

        let before_dedup = samples.len();
        samples.dedup_by_key(|s| s.timestamp);
        if samples.len() != before_dedup {
            log::warn!(
                "Station {}: removed {} samples with duplicate timestamps",
                series.station_id,
                before_dedup - samples.len()
            );
            quality_flags.push(QualityFlag::DuplicateTimestampsRemoved);
        }

        let mut computable = 0;
        let total_indicators = 4;

        // Strain rate compares the last window against the one before it
        if samples.len() > STRAIN_WINDOW {
            computable += 1;
        } else {
            quality_flags.push(QualityFlag::InsufficientSamplesForStrainRate);
        }

        if samples.len() >= DIRECTION_MIN_SAMPLES {
            computable += 1;
        } else {
            quality_flags.push(QualityFlag::InsufficientSamplesForDirection);
        }

        if samples.len() >= ACCELERATION_MIN_SAMPLES {
            computable += 1;
        } else {
            quality_flags.push(QualityFlag::InsufficientSamplesForAcceleration);
        }

        // Stress buildup only needs a single sample
        if !samples.is_empty() {
            computable += 1;
        }

        let coverage = f64::from(computable) / f64::from(total_indicators);
        let summary = summarize(&samples);

        NormalizedSeries {
            station_id: series.station_id.clone(),
            location: series.location,
            samples,
            summary,
            coverage,
            quality_flags,
        }
    }
}

/// Compute descriptive statistics over ordered samples
pub fn summarize(samples: &[DisplacementSample]) -> SeriesSummary {
    let (first, last) = match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return SeriesSummary {
                sample_count: 0,
                first_epoch: None,
                last_epoch: None,
                span_days: 0.0,
                net_displacement_mm: 0.0,
                mean_daily_rate_mm: 0.0,
            }
        }
    };

    let span_days = (last.timestamp - first.timestamp).num_seconds() as f64 / 86_400.0;
    let net_displacement_mm = ((last.north - first.north).powi(2)
        + (last.east - first.east).powi(2))
    .sqrt();
    let mean_daily_rate_mm = if span_days > 0.0 {
        net_displacement_mm / span_days
    } else {
        0.0
    };

    SeriesSummary {
        sample_count: samples.len(),
        first_epoch: Some(first.timestamp),
        last_epoch: Some(last.timestamp),
        span_days,
        net_displacement_mm,
        mean_daily_rate_mm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn daily_series(values: &[(f64, f64)]) -> DisplacementSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let samples = values
            .iter()
            .enumerate()
            .map(|(i, &(north, east))| {
                DisplacementSample::new(start + Duration::days(i as i64), north, east)
            })
            .collect();
        DisplacementSeries::new("TEST", samples)
    }

    #[test]
    fn test_full_coverage() {
        let series = daily_series(&[(0.0, 0.0); 20]);
        let normalized = SeriesNormalizer::normalize(&series);

        assert_eq!(normalized.samples.len(), 20);
        assert!((normalized.coverage - 1.0).abs() < f64::EPSILON);
        assert!(normalized.quality_flags.is_empty());
    }

    #[test]
    fn test_short_series_flags() {
        let series = daily_series(&[(0.0, 0.0); 6]);
        let normalized = SeriesNormalizer::normalize(&series);

        // Direction and buildup computable, strain rate and acceleration not
        assert!((normalized.coverage - 0.5).abs() < f64::EPSILON);
        assert!(normalized
            .quality_flags
            .contains(&QualityFlag::InsufficientSamplesForStrainRate));
        assert!(normalized
            .quality_flags
            .contains(&QualityFlag::InsufficientSamplesForAcceleration));
        assert!(!normalized
            .quality_flags
            .contains(&QualityFlag::InsufficientSamplesForDirection));
    }

    #[test]
    fn test_strain_rate_needs_an_older_window() {
        let exact = SeriesNormalizer::normalize(&daily_series(&[(0.0, 0.0); 10]));
        assert!((exact.coverage - 0.5).abs() < f64::EPSILON);
        assert!(exact
            .quality_flags
            .contains(&QualityFlag::InsufficientSamplesForStrainRate));

        let one_more = SeriesNormalizer::normalize(&daily_series(&[(0.0, 0.0); 11]));
        assert!((one_more.coverage - 0.75).abs() < f64::EPSILON);
        assert!(!one_more
            .quality_flags
            .contains(&QualityFlag::InsufficientSamplesForStrainRate));
    }

    #[test]
    fn test_empty_series() {
        let series = daily_series(&[]);
        let normalized = SeriesNormalizer::normalize(&series);

        assert_eq!(normalized.coverage, 0.0);
        assert_eq!(normalized.summary.sample_count, 0);
        assert!(normalized.summary.first_epoch.is_none());
    }

    #[test]
    fn test_sorts_and_dedupes() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let samples = vec![
            DisplacementSample::new(start + Duration::days(2), 2.0, 0.0),
            DisplacementSample::new(start, 0.0, 0.0),
            DisplacementSample::new(start + Duration::days(1), 1.0, 0.0),
            DisplacementSample::new(start + Duration::days(1), 9.0, 9.0),
        ];
        let series = DisplacementSeries::new("TEST", samples);
        let normalized = SeriesNormalizer::normalize(&series);

        assert_eq!(normalized.samples.len(), 3);
        assert_eq!(normalized.samples[1].north, 1.0);
        assert!(normalized.quality_flags.contains(&QualityFlag::UnsortedInput));
        assert!(normalized
            .quality_flags
            .contains(&QualityFlag::DuplicateTimestampsRemoved));
    }

    #[test]
    fn test_drops_non_finite_samples() {
        let series = daily_series(&[(0.0, 0.0), (f64::NAN, 1.0), (2.0, f64::INFINITY), (3.0, 0.0)]);
        let normalized = SeriesNormalizer::normalize(&series);

        assert_eq!(normalized.samples.len(), 2);
        assert!(normalized
            .quality_flags
            .contains(&QualityFlag::NonFiniteSamplesDropped));
    }

    #[test]
    fn test_summary_statistics() {
        let series = daily_series(&[(0.0, 0.0), (1.5, 1.0), (3.0, 4.0)]);
        let normalized = SeriesNormalizer::normalize(&series);
        let summary = normalized.summary;

        assert_eq!(summary.sample_count, 3);
        assert!((summary.span_days - 2.0).abs() < 1e-9);
        assert!((summary.net_displacement_mm - 5.0).abs() < 1e-9);
        assert!((summary.mean_daily_rate_mm - 2.5).abs() < 1e-9);
    }
}
