//! Nearby-station lookup
//!
//! Linear scan over a station list using great-circle distance. Station
//! directories are small (hundreds of entries) so no spatial index is kept.

use crate::geo::great_circle_distance_km;
use crate::types::{GeoPoint, NearbyStation, Station};

/// Stations within `radius_km` of `location`, nearest first
///
/// Ties on distance are broken by station id so results are deterministic.
pub fn rank_nearby(stations: &[Station], location: GeoPoint, radius_km: f64) -> Vec<NearbyStation> {
    let mut nearby: Vec<NearbyStation> = stations
        .iter()
        .filter_map(|station| {
            let distance_km = great_circle_distance_km(
                location.latitude,
                location.longitude,
                station.location.latitude,
                station.location.longitude,
            );
            (distance_km <= radius_km).then(|| NearbyStation {
                station: station.clone(),
                distance_km,
            })
        })
        .collect();

    nearby.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.station.id.cmp(&b.station.id))
    });
    nearby
}

/// The single nearest station within `radius_km`
pub fn nearest(stations: &[Station], location: GeoPoint, radius_km: f64) -> Option<NearbyStation> {
    rank_nearby(stations, location, radius_km).into_iter().next()
}
