//! GNSS displacement series adapter
//!
//! Parses station displacement payloads:
//!
//! ```json
//! {
//!   "station_id": "IISC",
//!   "latitude": 13.02, "longitude": 77.57,
//!   "samples": [{ "date": "2024-01-01", "north_mm": 0.4, "east_mm": -1.2 }]
//! }
//! ```
//!
//! Sample times may be RFC 3339 `timestamp`s or `YYYY-MM-DD` `date`s.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::error::StressError;
use crate::types::{DisplacementSample, DisplacementSeries, GeoPoint, SeriesSummary};

/// GNSS series payload adapter
pub struct GnssSeriesAdapter;

impl GnssSeriesAdapter {
    /// Parse a series payload
    pub fn parse(raw_json: &str) -> Result<DisplacementSeries, StressError> {
        let payload: GnssPayload = serde_json::from_str(raw_json)?;
        convert_payload(payload)
    }

    /// Parse a series payload without an embedded station id
    pub fn parse_for_station(
        raw_json: &str,
        station_id: &str,
    ) -> Result<DisplacementSeries, StressError> {
        let mut payload: GnssPayload = serde_json::from_str(raw_json)?;
        if payload.station_id.is_none() {
            payload.station_id = Some(station_id.to_string());
        }
        convert_payload(payload)
    }
}

fn convert_payload(payload: GnssPayload) -> Result<DisplacementSeries, StressError> {
    let station_id = payload
        .station_id
        .ok_or_else(|| StressError::MissingField("station_id".to_string()))?;

    let location = match (payload.latitude, payload.longitude) {
        (Some(latitude), Some(longitude)) => {
            let point = GeoPoint::new(latitude, longitude);
            if !point.is_valid() {
                return Err(StressError::InvalidLocation(format!(
                    "station {station_id} at ({latitude}, {longitude})"
                )));
            }
            Some(point)
        }
        _ => None,
    };

    let samples = payload
        .samples
        .into_iter()
        .enumerate()
        .map(|(index, raw)| convert_sample(index, raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DisplacementSeries {
        station_id,
        location,
        samples,
        summary: payload.summary,
    })
}

fn convert_sample(index: usize, raw: GnssSample) -> Result<DisplacementSample, StressError> {
    let timestamp = match (raw.timestamp, raw.date) {
        (Some(ts), _) => DateTime::parse_from_rfc3339(&ts)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| StressError::DateParseError(format!("sample {index}: {ts}: {e}")))?,
        (None, Some(date)) => NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|e| StressError::DateParseError(format!("sample {index}: {date}: {e}")))?
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| StressError::DateParseError(format!("sample {index}: {date}")))?
            .and_utc(),
        (None, None) => {
            return Err(StressError::MissingField(format!(
                "samples[{index}].timestamp"
            )))
        }
    };

    Ok(DisplacementSample::new(timestamp, raw.north, raw.east))
}

#[derive(Debug, Deserialize)]
struct GnssPayload {
    #[serde(default, alias = "station")]
    station_id: Option<String>,
    #[serde(default, alias = "lat")]
    latitude: Option<f64>,
    #[serde(default, alias = "lon")]
    longitude: Option<f64>,
    #[serde(default)]
    samples: Vec<GnssSample>,
    #[serde(default)]
    summary: Option<SeriesSummary>,
}

#[derive(Debug, Deserialize)]
struct GnssSample {
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(alias = "north_mm", alias = "dn")]
    north: f64,
    #[serde(alias = "east_mm", alias = "de")]
    east: f64,
}
