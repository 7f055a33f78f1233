// src/services/distance.rs
// DOCUMENTATION: Great-circle distance between coordinates
// PURPOSE: Single haversine implementation shared by ranking and routing

use geo_types::Point;

/// Earth's mean radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate distance between two coordinates in kilometers
/// Uses Haversine formula. The intermediate term is clamped to [0, 1] so
/// rounding near antipodal points cannot produce NaN.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    if lat1 == lat2 && lon1 == lon2 {
        return 0.0;
    }

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Haversine distance between two geo points (x = longitude, y = latitude)
pub fn distance_between(a: Point<f64>, b: Point<f64>) -> f64 {
    haversine_km(a.y(), a.x(), b.y(), b.x())
}
