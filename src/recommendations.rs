//! Recommendation generation
//!
//! Advisories come from an ordered rule table. Upstream recommendations are
//! passed through first, then each rule is evaluated in order and appends
//! its advisory when it fires. Region advisories are a separate, configurable
//! table so new jurisdictions never touch the scoring rules.

use crate::config::RegionRule;
use crate::types::{GeoPoint, GeodeticIndicators, SeismicityStressInput};

pub const ENHANCED_MONITORING: &str =
    "Enhanced monitoring recommended: seismicity-based stress is elevated";
pub const INCREASE_OBSERVATION: &str =
    "Increase GNSS observation frequency: strain rate is high";
pub const EARLY_WARNING: &str =
    "Activate early warning protocol: ground deformation is accelerating";
pub const EXPERT_CONSULTATION: &str =
    "Seek immediate expert consultation: high seismic stress with accelerating deformation";
pub const NORMAL_CONDITIONS: &str = "Stress indicators are within normal ranges";
pub const CONTINUE_MONITORING: &str = "Continue routine monitoring of geodetic and seismic data";

/// Inputs visible to a rule
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub geodetic: &'a GeodeticIndicators,
    pub seismicity: Option<&'a SeismicityStressInput>,
    pub seismicity_score: f64,
}

/// A single advisory rule
pub struct AdvisoryRule {
    pub name: &'static str,
    pub applies: fn(&RuleContext<'_>) -> bool,
    pub advisory: fn(&RuleContext<'_>) -> String,
}

/// Built-in rules, in evaluation order
pub const ADVISORY_RULES: &[AdvisoryRule] = &[
    AdvisoryRule {
        name: "enhanced_monitoring",
        applies: |ctx| ctx.seismicity_score > 60.0,
        advisory: |_| ENHANCED_MONITORING.to_string(),
    },
    AdvisoryRule {
        name: "increase_observation",
        applies: |ctx| ctx.geodetic.strain_rate > 0.5,
        advisory: |_| INCREASE_OBSERVATION.to_string(),
    },
    AdvisoryRule {
        name: "early_warning",
        applies: |ctx| ctx.geodetic.acceleration_trend > 0.3,
        advisory: |_| EARLY_WARNING.to_string(),
    },
    AdvisoryRule {
        name: "expert_consultation",
        applies: |ctx| ctx.seismicity_score > 80.0 && ctx.geodetic.acceleration_trend > 0.2,
        advisory: |_| EXPERT_CONSULTATION.to_string(),
    },
    AdvisoryRule {
        name: "earthquake_count",
        applies: |ctx| ctx.seismicity.is_some_and(|s| s.earthquake_count > 5),
        advisory: |ctx| {
            let count = ctx.seismicity.map_or(0, |s| s.earthquake_count);
            format!("{count} recent earthquakes recorded nearby; review local emergency plans")
        },
    },
];

/// Recommendation generator with a configurable region table
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    region_rules: Vec<RegionRule>,
}

impl RecommendationEngine {
    pub fn new(region_rules: Vec<RegionRule>) -> Self {
        Self { region_rules }
    }

    pub fn region_rules(&self) -> &[RegionRule] {
        &self.region_rules
    }

    /// Produce the ordered advisory list; never empty
    pub fn generate(
        &self,
        geodetic: &GeodeticIndicators,
        seismicity: Option<&SeismicityStressInput>,
        location: Option<GeoPoint>,
    ) -> Vec<String> {
        let ctx = RuleContext {
            geodetic,
            seismicity,
            seismicity_score: seismicity.map_or(0.0, |s| s.score),
        };

        let mut recommendations: Vec<String> = seismicity
            .map(|s| s.recommendations.clone())
            .unwrap_or_default();

        for rule in ADVISORY_RULES {
            if (rule.applies)(&ctx) {
                log::debug!("Advisory rule '{}' fired", rule.name);
                recommendations.push((rule.advisory)(&ctx));
            }
        }

        if let Some(point) = location {
            if let Some(rule) = self.region_rules.iter().find(|r| r.contains(point)) {
                log::debug!("Region rule '{}' fired", rule.name);
                recommendations.push(rule.advisory.clone());
            }
        }

        if recommendations.is_empty() {
            recommendations.push(NORMAL_CONDITIONS.to_string());
            recommendations.push(CONTINUE_MONITORING.to_string());
        }

        recommendations
    }
}
