//! Assessment encoding
//!
//! This module wraps a stress assessment in a self-describing JSON payload
//! with producer, provenance, and quality metadata.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StressError;
use crate::types::{NormalizedSeries, SeriesSummary, StressAssessment, TectonicContext};
use crate::{GEOSTRESS_VERSION, PRODUCER_NAME};

/// Current output schema version
pub const PAYLOAD_SCHEMA_VERSION: &str = "geostress.assessment.v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadProvenance {
    pub station_id: String,
    /// "geodetic only" or "geodetic + seismicity"
    pub inputs: String,
    pub first_sample_utc: Option<String>,
    pub last_sample_utc: Option<String>,
    pub computed_at_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadQuality {
    pub coverage: f64,
    pub sample_count: usize,
    pub flags: Vec<String>,
}

/// Complete output payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentPayload {
    pub schema_version: String,
    pub producer: PayloadProducer,
    pub provenance: PayloadProvenance,
    pub quality: PayloadQuality,
    pub summary: SeriesSummary,
    pub assessment: StressAssessment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tectonic: Option<TectonicContext>,
}

/// Encoder for producing assessment payloads
pub struct AssessmentEncoder {
    instance_id: String,
}

impl Default for AssessmentEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl AssessmentEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn encode(
        &self,
        assessment: &StressAssessment,
        series: &NormalizedSeries,
        tectonic: Option<TectonicContext>,
    ) -> AssessmentPayload {
        AssessmentPayload {
            schema_version: PAYLOAD_SCHEMA_VERSION.to_string(),
            producer: PayloadProducer {
                name: PRODUCER_NAME.to_string(),
                version: GEOSTRESS_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            provenance: PayloadProvenance {
                station_id: assessment.station_id.clone(),
                inputs: assessment.provenance.as_str().to_string(),
                first_sample_utc: series.summary.first_epoch.map(|t| t.to_rfc3339()),
                last_sample_utc: series.summary.last_epoch.map(|t| t.to_rfc3339()),
                computed_at_utc: Utc::now().to_rfc3339(),
            },
            quality: PayloadQuality {
                coverage: assessment.coverage,
                sample_count: assessment.sample_count,
                flags: assessment
                    .quality_flags
                    .iter()
                    .map(|f| f.as_str().to_string())
                    .collect(),
            },
            summary: series.summary.clone(),
            assessment: assessment.clone(),
            tectonic,
        }
    }

    /// Encode to compact JSON
    pub fn encode_to_json(
        &self,
        assessment: &StressAssessment,
        series: &NormalizedSeries,
        tectonic: Option<TectonicContext>,
    ) -> Result<String, StressError> {
        let payload = self.encode(assessment, series, tectonic);
        serde_json::to_string(&payload).map_err(|e| StressError::EncodingError(e.to_string()))
    }

    /// Encode to pretty-printed JSON
    pub fn encode_to_json_pretty(
        &self,
        assessment: &StressAssessment,
        series: &NormalizedSeries,
        tectonic: Option<TectonicContext>,
    ) -> Result<String, StressError> {
        let payload = self.encode(assessment, series, tectonic);
        serde_json::to_string_pretty(&payload)
            .map_err(|e| StressError::EncodingError(e.to_string()))
    }
}
