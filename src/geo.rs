//! Geodesy helpers
//!
//! Pure spherical-earth approximations used for station selection and
//! plate-boundary proximity ranking:
//! - Great-circle distance (haversine)
//! - Ray-casting point-in-polygon
//! - Endpoint-based distance to segments and line strings

/// Mean Earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance between two points in kilometres
pub fn great_circle_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Ray-casting containment test over a ring of `(lon, lat)` vertices.
///
/// The ring may be open or closed. Points exactly on an edge may land on
/// either side.
pub fn point_in_polygon(lat: f64, lon: f64, ring: &[(f64, f64)]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;

    for i in 0..ring.len() {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];

        if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Spherical law-of-cosines distance in kilometres
fn law_of_cosines_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_lambda = (lon2 - lon1).to_radians();
    // Rounding can push the cosine just past 1 for coincident points
    let cos_c = (phi1.sin() * phi2.sin() + phi1.cos() * phi2.cos() * d_lambda.cos()).clamp(-1.0, 1.0);
    EARTH_RADIUS_KM * cos_c.acos()
}

/// Approximate distance from a point to a segment of `(lon, lat)` endpoints.
///
/// Uses the nearer endpoint rather than a perpendicular projection, which is
/// enough for coarse proximity ranking.
pub fn distance_to_segment_km(lat: f64, lon: f64, a: (f64, f64), b: (f64, f64)) -> f64 {
    let to_a = law_of_cosines_km(lat, lon, a.1, a.0);
    let to_b = law_of_cosines_km(lat, lon, b.1, b.0);
    to_a.min(to_b)
}

/// Approximate distance from a point to a line string of `(lon, lat)` vertices.
///
/// Returns `None` for an empty line string.
pub fn distance_to_line_string_km(lat: f64, lon: f64, line: &[(f64, f64)]) -> Option<f64> {
    match line {
        [] => None,
        [only] => Some(law_of_cosines_km(lat, lon, only.1, only.0)),
        _ => line
            .windows(2)
            .map(|pair| distance_to_segment_km(lat, lon, pair[0], pair[1]))
            .reduce(f64::min),
    }
}
