//! Great-circle distance helpers used to spot duplicate submissions.

use crate::facility::Facility;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default radius for "same place" checks: 50 metres.
pub const DEFAULT_NEARBY_THRESHOLD_KM: f64 = 0.05;

/// Haversine distance between two coordinates, in kilometres.
#[must_use]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Returns the entries within `threshold_km` of the given point, in input order.
#[must_use]
pub fn find_nearby<'a>(
    latitude: f64,
    longitude: f64,
    entries: &'a [Facility],
    threshold_km: f64,
) -> Vec<&'a Facility> {
    entries
        .iter()
        .filter(|f| distance_km(latitude, longitude, f.latitude, f.longitude) <= threshold_km)
        .collect()
}
