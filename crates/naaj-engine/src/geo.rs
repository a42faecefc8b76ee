//! Great-circle distance and map-link synthesis.
//!
//! Distance is a ranking key only: missing coordinates degrade to a "very
//! far" sentinel instead of an error so ordering never fails.

use crate::types::Coordinates;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Sentinel distance for records or queries without coordinates.
pub const FAR_AWAY_KM: f64 = 9999.0;

/// Haversine great-circle distance in kilometers.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Distance between two optional positions; `FAR_AWAY_KM` if either is missing.
pub fn distance_km(from: Option<&Coordinates>, to: Option<&Coordinates>) -> f64 {
    match (from, to) {
        (Some(a), Some(b)) => haversine_km(a.lat, a.lng, b.lat, b.lng),
        _ => FAR_AWAY_KM,
    }
}

pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Build a Google Maps link for a place: coordinates when available,
/// name + address as a text query otherwise.
pub fn map_link(coordinates: Option<&Coordinates>, name: &str, address: &str) -> String {
    match coordinates {
        Some(c) => format!(
            "https://www.google.com/maps/search/?api=1&query={},{}",
            c.lat, c.lng
        ),
        None => {
            let query = format!("{} {}", name.trim(), address.trim());
            format!(
                "https://www.google.com/maps/search/?api=1&query={}",
                query.split_whitespace().collect::<Vec<_>>().join("+")
            )
        }
    }
}
