//! Geodetic indicator derivation
//!
//! This module derives stress indicators from an ordered displacement series:
//! - Strain rate (change in displacement magnitude between recent windows)
//! - Direction consistency (spread of step bearings)
//! - Acceleration trend (displacement rate, last third vs first third)
//! - Stress buildup (net displacement per sample, bounded)
//!
//! Each indicator falls back to 0 when the series is too short for it.

use std::f64::consts::PI;

use crate::types::{DisplacementSample, GeodeticIndicators, IndicatorLevel, NormalizedSeries};

/// Width of each strain-rate comparison window (samples)
pub const STRAIN_WINDOW: usize = 10;
pub const STRAIN_RATE_MIN_SAMPLES: usize = STRAIN_WINDOW;
pub const DIRECTION_MIN_SAMPLES: usize = 5;
pub const ACCELERATION_MIN_SAMPLES: usize = 15;

/// Floor on the early displacement rate used as the acceleration divisor
const MIN_RATE_DIVISOR: f64 = 0.1;

/// Feature deriver for computing geodetic indicators
pub struct IndicatorDeriver;

impl IndicatorDeriver {
    /// Derive all geodetic indicators from a normalized series
    pub fn derive(series: &NormalizedSeries) -> GeodeticIndicators {
        let samples = &series.samples;

        let indicators = GeodeticIndicators {
            strain_rate: compute_strain_rate(samples),
            direction_consistency: compute_direction_consistency(samples),
            acceleration_trend: compute_acceleration_trend(samples),
            stress_buildup: compute_stress_buildup(samples),
        };

        log::debug!(
            "Station {}: strain_rate={:.4} direction={:.4} acceleration={:.4} buildup={:.4}",
            series.station_id,
            indicators.strain_rate,
            indicators.direction_consistency,
            indicators.acceleration_trend,
            indicators.stress_buildup
        );

        indicators
    }
}

/// Straight-line horizontal distance between two samples (mm)
fn displacement_between(a: &DisplacementSample, b: &DisplacementSample) -> f64 {
    ((b.north - a.north).powi(2) + (b.east - a.east).powi(2)).sqrt()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Change in mean displacement magnitude between the last 10 samples and the
/// 10 before them, per sample
pub fn compute_strain_rate(samples: &[DisplacementSample]) -> f64 {
    let n = samples.len();
    if n < STRAIN_RATE_MIN_SAMPLES {
        return 0.0;
    }

    let recent = &samples[n - STRAIN_WINDOW..];
    let older = &samples[n.saturating_sub(2 * STRAIN_WINDOW)..n - STRAIN_WINDOW];

    match (
        mean(recent.iter().map(DisplacementSample::magnitude)),
        mean(older.iter().map(DisplacementSample::magnitude)),
    ) {
        (Some(recent_avg), Some(older_avg)) => (recent_avg - older_avg).abs() / STRAIN_WINDOW as f64,
        // No earlier window to compare against
        _ => 0.0,
    }
}

/// How consistently consecutive steps point the same way (0-1).
///
/// Uses the arithmetic mean of step bearings, not a circular mean, so
/// bearings straddling due south (±π) read as inconsistent.
pub fn compute_direction_consistency(samples: &[DisplacementSample]) -> f64 {
    if samples.len() < DIRECTION_MIN_SAMPLES {
        return 0.0;
    }

    // Zero-length steps have no bearing
    let bearings: Vec<f64> = samples
        .windows(2)
        .filter_map(|w| {
            let d_north = w[1].north - w[0].north;
            let d_east = w[1].east - w[0].east;
            if d_north == 0.0 && d_east == 0.0 {
                None
            } else {
                Some(d_east.atan2(d_north))
            }
        })
        .collect();

    let Some(mean_bearing) = mean(bearings.iter().copied()) else {
        return 0.0;
    };
    let mean_deviation = mean(bearings.iter().map(|b| (b - mean_bearing).abs())).unwrap_or(0.0);

    (1.0 - mean_deviation / PI).max(0.0)
}

/// Average displacement per sample across a window
fn window_rate(window: &[DisplacementSample]) -> f64 {
    match (window.first(), window.last()) {
        (Some(first), Some(last)) => displacement_between(first, last) / window.len() as f64,
        _ => 0.0,
    }
}

/// Relative change in displacement rate between the first and last thirds.
///
/// The divisor is floored at 0.1, so a near-stationary start inflates the
/// ratio.
pub fn compute_acceleration_trend(samples: &[DisplacementSample]) -> f64 {
    let n = samples.len();
    if n < ACCELERATION_MIN_SAMPLES {
        return 0.0;
    }

    let third = n / 3;
    let first_rate = window_rate(&samples[..third]);
    let last_rate = window_rate(&samples[n - third..]);

    (last_rate - first_rate) / first_rate.max(MIN_RATE_DIVISOR)
}

/// Net displacement per sample, scaled by 1/10 and clamped to 0-1
pub fn compute_stress_buildup(samples: &[DisplacementSample]) -> f64 {
    match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => {
            let per_sample = displacement_between(first, last) / samples.len() as f64;
            (per_sample / 10.0).clamp(0.0, 1.0)
        }
        _ => 0.0,
    }
}

pub fn classify_strain_rate(value: f64) -> IndicatorLevel {
    if value > 0.5 {
        IndicatorLevel::High
    } else if value > 0.2 {
        IndicatorLevel::Medium
    } else {
        IndicatorLevel::Low
    }
}

pub fn classify_direction_consistency(value: f64) -> IndicatorLevel {
    if value > 0.8 {
        IndicatorLevel::High
    } else if value > 0.5 {
        IndicatorLevel::Medium
    } else {
        IndicatorLevel::Low
    }
}

pub fn classify_acceleration_trend(value: f64) -> IndicatorLevel {
    if value > 0.3 {
        IndicatorLevel::Increasing
    } else if value < -0.3 {
        IndicatorLevel::Decreasing
    } else {
        IndicatorLevel::Stable
    }
}

pub fn classify_stress_buildup(value: f64) -> IndicatorLevel {
    if value > 0.7 {
        IndicatorLevel::Critical
    } else if value > 0.4 {
        IndicatorLevel::High
    } else if value > 0.2 {
        IndicatorLevel::Medium
    } else {
        IndicatorLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn samples_from(values: impl IntoIterator<Item = (f64, f64)>) -> Vec<DisplacementSample> {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        values
            .into_iter()
            .enumerate()
            .map(|(i, (north, east))| {
                DisplacementSample::new(start + Duration::days(i as i64), north, east)
            })
            .collect()
    }

    fn northward(count: usize) -> Vec<DisplacementSample> {
        samples_from((0..count).map(|i| (i as f64, 0.0)))
    }

    #[test]
    fn test_short_series_yield_zero() {
        for n in 0..STRAIN_RATE_MIN_SAMPLES {
            assert_eq!(compute_strain_rate(&northward(n)), 0.0);
        }
        for n in 0..DIRECTION_MIN_SAMPLES {
            assert_eq!(compute_direction_consistency(&northward(n)), 0.0);
        }
        for n in 0..ACCELERATION_MIN_SAMPLES {
            assert_eq!(compute_acceleration_trend(&northward(n)), 0.0);
        }
        assert_eq!(compute_stress_buildup(&[]), 0.0);
    }

    #[test]
    fn test_stationary_series() {
        let samples = samples_from(std::iter::repeat((0.0, 0.0)).take(20));

        assert_eq!(compute_strain_rate(&samples), 0.0);
        let consistency = compute_direction_consistency(&samples);
        assert!(!consistency.is_nan());
        assert_eq!(consistency, 0.0);
        assert_eq!(compute_acceleration_trend(&samples), 0.0);
        assert_eq!(compute_stress_buildup(&samples), 0.0);
    }

    #[test]
    fn test_strain_rate_constant_velocity() {
        // Magnitudes 0..19: older mean 4.5, recent mean 14.5
        let samples = northward(20);
        assert!((compute_strain_rate(&samples) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_strain_rate_uses_partial_older_window() {
        // 15 samples: older window is indices 0..5 (mean 2), recent 5..15 (mean 9.5)
        let samples = northward(15);
        assert!((compute_strain_rate(&samples) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_strain_rate_needs_an_older_window() {
        assert_eq!(compute_strain_rate(&northward(10)), 0.0);
    }

    #[test]
    fn test_direction_consistency_straight_line() {
        let samples = northward(20);
        assert!((compute_direction_consistency(&samples) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_direction_consistency_alternating() {
        // North, then east, then north...: bearings 0 and π/2, mean π/4
        let mut north = 0.0;
        let mut east = 0.0;
        let mut values = vec![(0.0, 0.0)];
        for i in 0..10 {
            if i % 2 == 0 {
                north += 1.0;
            } else {
                east += 1.0;
            }
            values.push((north, east));
        }
        let consistency = compute_direction_consistency(&samples_from(values));
        assert!((consistency - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_direction_consistency_reversals_bottom_out() {
        // Back-and-forth north/south: bearings 0 and π
        let values = (0..11).map(|i| (if i % 2 == 0 { 0.0 } else { 1.0 }, 0.0));
        let consistency = compute_direction_consistency(&samples_from(values));
        assert!((consistency - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_acceleration_constant_rate_is_zero() {
        assert!(compute_acceleration_trend(&northward(20)).abs() < 1e-12);
    }

    #[test]
    fn test_acceleration_speeding_up() {
        // Quadratic growth: later thirds move faster
        let samples = samples_from((0..15).map(|i| ((i * i) as f64 * 0.1, 0.0)));
        let trend = compute_acceleration_trend(&samples);
        // First third 0..5: (1.6 - 0) / 5 = 0.32; last third 10..15: (19.6 - 10) / 5 = 1.92
        assert!((trend - (1.92 - 0.32) / 0.32).abs() < 1e-9);
        assert_eq!(classify_acceleration_trend(trend), IndicatorLevel::Increasing);
    }

    #[test]
    fn test_acceleration_divisor_floor() {
        // Stationary start, then movement
        let values = (0..15).map(|i| if i < 10 { (0.0, 0.0) } else { ((i - 9) as f64, 0.0) });
        let trend = compute_acceleration_trend(&samples_from(values));
        // Last third 10..15 moves 4mm over 5 samples = 0.8; first rate 0 floored to 0.1
        assert!((trend - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_stress_buildup_scaling_and_clamp() {
        // 19mm over 20 samples -> 0.95 per sample -> 0.095
        assert!((compute_stress_buildup(&northward(20)) - 0.095).abs() < 1e-12);

        let fast = samples_from([(0.0, 0.0), (300.0, 400.0)]);
        assert_eq!(compute_stress_buildup(&fast), 1.0);
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(classify_strain_rate(0.51), IndicatorLevel::High);
        assert_eq!(classify_strain_rate(0.5), IndicatorLevel::Medium);
        assert_eq!(classify_strain_rate(0.2), IndicatorLevel::Low);

        assert_eq!(classify_direction_consistency(0.81), IndicatorLevel::High);
        assert_eq!(classify_direction_consistency(0.6), IndicatorLevel::Medium);
        assert_eq!(classify_direction_consistency(0.5), IndicatorLevel::Low);

        assert_eq!(classify_acceleration_trend(-0.31), IndicatorLevel::Decreasing);
        assert_eq!(classify_acceleration_trend(0.3), IndicatorLevel::Stable);

        assert_eq!(classify_stress_buildup(0.71), IndicatorLevel::Critical);
        assert_eq!(classify_stress_buildup(0.5), IndicatorLevel::High);
        assert_eq!(classify_stress_buildup(0.3), IndicatorLevel::Medium);
        assert_eq!(classify_stress_buildup(0.2), IndicatorLevel::Low);
    }
}
