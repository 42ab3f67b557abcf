//! Data gateways
//!
//! This module defines the collaborator interfaces the engine depends on and
//! adapters that parse gateway JSON payloads into the engine's data model.
//! Gateways report failures as errors; callers decide whether a failure means
//! "no assessment" or "assess without this input".

mod fixture;
mod gnss;
mod seismicity;
mod stations;

pub use fixture::{FixtureGateway, LocatedSeismicity};
pub use gnss::GnssSeriesAdapter;
pub use seismicity::SeismicityAdapter;
pub use stations::StationAdapter;

use crate::error::StressError;
use crate::types::{DateRange, DisplacementSeries, GeoPoint, NearbyStation, SeismicityStressInput};

/// Source of station displacement time series
pub trait DisplacementSource: Sync {
    /// Fetch the series for `station_id`, limited to `range`
    fn fetch_series(
        &self,
        station_id: &str,
        range: &DateRange,
    ) -> Result<DisplacementSeries, StressError>;
}

/// Source of seismicity-derived stress scores
pub trait SeismicitySource: Sync {
    /// Fetch the score for `location`; `Ok(None)` when the source has no data
    fn fetch_seismicity(
        &self,
        location: GeoPoint,
        window: &DateRange,
    ) -> Result<Option<SeismicityStressInput>, StressError>;
}

/// Directory of geodetic monitoring stations
pub trait StationDirectory: Sync {
    /// Stations within `radius_km` of `location`, nearest first
    fn nearby_stations(
        &self,
        location: GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<NearbyStation>, StressError>;
}
