// src/models/place.rs
// DOCUMENTATION: Core data structures for points of interest
// PURPOSE: Catalog entries consumed by the ranker and the itinerary builder

use geo_types::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Interest category of a place
/// DOCUMENTATION: Closed enumeration; declaration order is the catalog order
/// used when generating one plan option per category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Nature,
    Culture,
    Food,
    Shopping,
    Nightlife,
    Relaxation,
    Adventure,
}

impl Category {
    /// All categories in catalog enumeration order
    pub const ALL: [Category; 7] = [
        Category::Nature,
        Category::Culture,
        Category::Food,
        Category::Shopping,
        Category::Nightlife,
        Category::Relaxation,
        Category::Adventure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Nature => "NATURE",
            Category::Culture => "CULTURE",
            Category::Food => "FOOD",
            Category::Shopping => "SHOPPING",
            Category::Nightlife => "NIGHTLIFE",
            Category::Relaxation => "RELAXATION",
            Category::Adventure => "ADVENTURE",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == upper)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// A point of interest from the external catalog
/// DOCUMENTATION: Immutable from the engine's perspective; rows from the
/// places table are mapped into this struct by PlaceRepository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOfInterest {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: Category,
    /// Higher is better
    pub rating: f64,
}

impl PlaceOfInterest {
    /// Location as a geo point (x = longitude, y = latitude)
    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// Query parameters for GET /places/nearby
#[derive(Debug, Deserialize, Validate)]
pub struct NearbyQuery {
    /// Restrict to a city; all places are considered when absent
    pub city: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: f64,

    /// Preferred category, ranked first
    pub category: Option<Category>,

    #[validate(range(min = 0.0))]
    pub radius_km: Option<f64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

/// A place annotated with its distance from the search origin
#[derive(Debug, Clone, Serialize)]
pub struct PlaceNearbyResponse {
    #[serde(flatten)]
    pub place: PlaceOfInterest,
    pub distance_km: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_case_insensitive() {
        assert_eq!("culture".parse::<Category>(), Ok(Category::Culture));
        assert_eq!(" NightLife ".parse::<Category>(), Ok(Category::Nightlife));
        assert!("museum".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_uses_upper_case() {
        let json = serde_json::to_string(&Category::Relaxation).unwrap();
        assert_eq!(json, "\"RELAXATION\"");

        let parsed: Category = serde_json::from_str("\"ADVENTURE\"").unwrap();
        assert_eq!(parsed, Category::Adventure);
    }

    #[test]
    fn test_point_is_lon_lat() {
        let place = PlaceOfInterest {
            id: Uuid::nil(),
            name: "Fort".to_string(),
            city: "Jaipur".to_string(),
            latitude: 26.98,
            longitude: 75.85,
            category: Category::Culture,
            rating: 4.6,
        };

        assert_eq!(place.point().x(), 75.85);
        assert_eq!(place.point().y(), 26.98);
    }
}
