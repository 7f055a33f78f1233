// src/services/fixtures.rs
// Test-only catalog builders

use crate::models::{Category, PlaceOfInterest};
use crate::services::distance::EARTH_RADIUS_KM;
use geo_types::Point;
use uuid::Uuid;

pub const ORIGIN_LAT: f64 = 10.0;
pub const ORIGIN_LON: f64 = 20.0;

pub fn origin() -> Point<f64> {
    Point::new(ORIGIN_LON, ORIGIN_LAT)
}

/// A place `km` kilometers due north of the test origin
pub fn place_km_north(name: &str, category: Category, rating: f64, km: f64) -> PlaceOfInterest {
    let degrees = km / (EARTH_RADIUS_KM * std::f64::consts::PI / 180.0);
    PlaceOfInterest {
        id: Uuid::new_v4(),
        name: name.to_string(),
        city: "Rivertown".to_string(),
        latitude: ORIGIN_LAT + degrees,
        longitude: ORIGIN_LON,
        category,
        rating,
    }
}

/// A place `km` kilometers due east of the test origin (along the parallel)
pub fn place_km_east(name: &str, category: Category, rating: f64, km: f64) -> PlaceOfInterest {
    let degrees = km / (EARTH_RADIUS_KM * std::f64::consts::PI / 180.0 * ORIGIN_LAT.to_radians().cos());
    PlaceOfInterest {
        id: Uuid::new_v4(),
        name: name.to_string(),
        city: "Rivertown".to_string(),
        latitude: ORIGIN_LAT,
        longitude: ORIGIN_LON + degrees,
        category,
        rating,
    }
}
