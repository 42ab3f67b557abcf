//! Stress scoring
//!
//! Fuses geodetic indicators with the seismicity score into the overall
//! stress classification and builds the per-indicator readings.

use crate::features::{
    classify_acceleration_trend, classify_direction_consistency, classify_strain_rate,
    classify_stress_buildup,
};
use crate::types::{
    GeodeticIndicators, IndicatorLevel, IndicatorReading, OverallStress, SeismicityStressInput,
    StressIndicators, StressLevel,
};

/// Weight of strain rate in the overall score
pub const STRAIN_RATE_WEIGHT: f64 = 20.0;
/// Weight of |acceleration trend| in the overall score
pub const ACCELERATION_WEIGHT: f64 = 15.0;

/// Seismicity score used in the fusion, 0 when the input is absent
pub fn seismicity_score(seismicity: Option<&SeismicityStressInput>) -> f64 {
    seismicity.map_or(0.0, |s| s.score)
}

/// Overall score: seismicity + strain_rate x 20 + |acceleration_trend| x 15
pub fn overall_score(geodetic: &GeodeticIndicators, seismicity_score: f64) -> f64 {
    seismicity_score
        + geodetic.strain_rate * STRAIN_RATE_WEIGHT
        + geodetic.acceleration_trend.abs() * ACCELERATION_WEIGHT
}

/// Classify the fused score
pub fn overall_stress(geodetic: &GeodeticIndicators, seismicity_score: f64) -> OverallStress {
    let numeric_score = overall_score(geodetic, seismicity_score);
    let level = StressLevel::from_score(numeric_score);

    OverallStress {
        level,
        numeric_score,
        color_hint: level.color().to_string(),
    }
}

/// Build the classified indicator readings
pub fn build_indicators(
    geodetic: &GeodeticIndicators,
    seismicity: Option<&SeismicityStressInput>,
) -> StressIndicators {
    StressIndicators {
        strain_rate: IndicatorReading {
            value: geodetic.strain_rate,
            level: classify_strain_rate(geodetic.strain_rate),
            description: "Rate of change in ground displacement over the last 10 samples"
                .to_string(),
        },
        direction_consistency: IndicatorReading {
            value: geodetic.direction_consistency,
            level: classify_direction_consistency(geodetic.direction_consistency),
            description: "Consistency of horizontal movement direction".to_string(),
        },
        acceleration_trend: IndicatorReading {
            value: geodetic.acceleration_trend,
            level: classify_acceleration_trend(geodetic.acceleration_trend),
            description: "Change in displacement rate, latest third versus earliest third"
                .to_string(),
        },
        stress_buildup: IndicatorReading {
            value: geodetic.stress_buildup,
            level: classify_stress_buildup(geodetic.stress_buildup),
            description: "Net displacement per sample as a bounded buildup index".to_string(),
        },
        seismic_activity: seismic_reading(seismicity),
    }
}

fn seismic_reading(seismicity: Option<&SeismicityStressInput>) -> IndicatorReading {
    match seismicity {
        Some(input) => {
            let description = if input.basis.trim().is_empty() {
                format!("Based on {} recent earthquakes", input.earthquake_count)
            } else {
                input.basis.clone()
            };
            IndicatorReading {
                value: input.score,
                level: IndicatorLevel::from_label(&input.label),
                description,
            }
        }
        None => IndicatorReading {
            value: 0.0,
            level: IndicatorLevel::Unknown,
            description: "No seismicity data available".to_string(),
        },
    }
}
