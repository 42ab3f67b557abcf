//! Seismicity stress adapter
//!
//! Accepts either the compact form
//! (`score`, `label`, `earthquake_count`, `basis`, `recommendations`) or the
//! prediction service's stress-analysis response (`stress_score`,
//! `stress_level`, `earthquake_count`, `stress_analysis.stress_pattern`).
//! A service response that carries a pattern but no score is scored from the
//! pattern and its `stress_indicators`.
//! `null`, `{}`, and responses without a usable pattern parse as absent.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::StressError;
use crate::types::SeismicityStressInput;

/// Patterns the prediction service emits when it could not score a location
const NO_DATA_PATTERNS: &[&str] = &["insufficient_data", "analysis_error"];

/// Base score for each stress pattern the prediction service classifies
const PATTERN_SCORES: &[(&str, f64)] = &[
    ("escalating_sequence", 85.0),
    ("tight_clustering", 80.0),
    ("rapid_energy_release", 95.0),
    ("decreasing_activity", 25.0),
    ("distributed_activity", 50.0),
    ("normal_background", 15.0),
];

/// Seismicity payload adapter
pub struct SeismicityAdapter;

impl SeismicityAdapter {
    /// Parse a seismicity payload; `Ok(None)` when it carries no score
    pub fn parse(raw_json: &str) -> Result<Option<SeismicityStressInput>, StressError> {
        let payload: Option<SeismicityPayload> = serde_json::from_str(raw_json)?;
        payload.map_or(Ok(None), convert_payload)
    }

    /// Parse an array of payloads, dropping absent entries
    pub fn parse_many(raw_json: &str) -> Result<Vec<SeismicityStressInput>, StressError> {
        let payloads: Vec<Option<SeismicityPayload>> = serde_json::from_str(raw_json)?;
        let mut inputs = Vec::new();
        for payload in payloads.into_iter().flatten() {
            if let Some(input) = convert_payload(payload)? {
                inputs.push(input);
            }
        }
        Ok(inputs)
    }
}

pub(crate) fn convert_payload(
    payload: SeismicityPayload,
) -> Result<Option<SeismicityStressInput>, StressError> {
    let (pattern, stress_indicators) = match payload.stress_analysis {
        Some(analysis) => (analysis.stress_pattern, analysis.stress_indicators),
        None => (None, None),
    };

    if let Some(p) = pattern.as_deref() {
        if NO_DATA_PATTERNS.contains(&p) {
            log::debug!("Seismicity source reported '{p}', treating as absent");
            return Ok(None);
        }
    }

    let (score, label) = match (payload.score, pattern.as_deref()) {
        (Some(score), _) => (score, payload.label),
        (None, Some(p)) => match score_from_pattern(p, stress_indicators.as_ref()) {
            Some(score) => {
                log::debug!("Derived seismicity score {score} from pattern '{p}'");
                (score, payload.label.or_else(|| Some(label_for_score(score).to_string())))
            }
            None => {
                log::debug!("Unrecognised stress pattern '{p}' without a score, treating as absent");
                return Ok(None);
            }
        },
        (None, None) => return Ok(None),
    };
    if !score.is_finite() {
        return Err(StressError::ParseError(format!(
            "seismicity score is not finite: {score}"
        )));
    }

    let earthquake_count = payload.earthquake_count.unwrap_or(0);
    let basis = match (payload.basis, pattern) {
        (Some(basis), _) if !basis.trim().is_empty() => basis,
        (_, Some(pattern)) => format!(
            "{} pattern across {earthquake_count} recent earthquakes",
            pattern.replace('_', " ")
        ),
        _ => format!("{earthquake_count} recent earthquakes"),
    };

    let recommendations = payload
        .recommendations
        .unwrap_or_default()
        .into_iter()
        .map(RecommendationEntry::into_text)
        .filter(|text| !text.trim().is_empty())
        .collect();

    Ok(Some(SeismicityStressInput {
        score,
        label: label.unwrap_or_else(|| "Unknown".to_string()),
        earthquake_count,
        basis,
        recommendations,
    }))
}

/// Pattern base score adjusted by the service's stress indicators, clamped to 0..=100
///
/// An empty indicator map leaves the base score untouched. Otherwise missing
/// indicators read as 0, so a missing `spatial_spread` counts as localized.
fn score_from_pattern(pattern: &str, indicators: Option<&Map<String, Value>>) -> Option<f64> {
    let base = PATTERN_SCORES
        .iter()
        .find(|(name, _)| *name == pattern)
        .map(|(_, score)| *score)?;

    let mut adjustment = 0.0;
    if let Some(indicators) = indicators.filter(|m| !m.is_empty()) {
        let read = |key: &str| indicators.get(key).and_then(Value::as_f64).unwrap_or(0.0);

        let magnitude_trend = read("magnitude_trend");
        if magnitude_trend > 0.1 {
            adjustment += 10.0;
        } else if magnitude_trend < -0.1 {
            adjustment -= 10.0;
        }
        if read("clustering_coefficient") > 0.5 {
            adjustment += 15.0;
        }
        if read("energy_accumulation_rate") > 2.0 {
            adjustment += 20.0;
        }
        let spatial_spread = read("spatial_spread");
        if spatial_spread < 0.1 {
            adjustment += 5.0;
        } else if spatial_spread > 0.3 {
            adjustment -= 5.0;
        }
    }

    Some((base + adjustment).clamp(0.0, 100.0))
}

fn label_for_score(score: f64) -> &'static str {
    match score {
        s if s >= 80.0 => "Critical",
        s if s >= 60.0 => "High",
        s if s >= 40.0 => "Medium",
        s if s > 0.0 => "Low",
        _ => "Unknown",
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SeismicityPayload {
    #[serde(default, alias = "stress_score")]
    score: Option<f64>,
    #[serde(default, alias = "stress_level")]
    label: Option<String>,
    #[serde(default)]
    earthquake_count: Option<u32>,
    #[serde(default)]
    basis: Option<String>,
    #[serde(default)]
    stress_analysis: Option<StressAnalysis>,
    #[serde(default)]
    recommendations: Option<Vec<RecommendationEntry>>,
}

#[derive(Debug, Deserialize)]
struct StressAnalysis {
    #[serde(default)]
    stress_pattern: Option<String>,
    #[serde(default)]
    stress_indicators: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecommendationEntry {
    Text(String),
    Detailed {
        title: String,
        #[serde(default)]
        description: Option<String>,
    },
}

impl RecommendationEntry {
    fn into_text(self) -> String {
        match self {
            RecommendationEntry::Text(text) => text,
            RecommendationEntry::Detailed {
                title,
                description: Some(description),
            } => format!("{title}: {description}"),
            RecommendationEntry::Detailed { title, .. } => title,
        }
    }
}
