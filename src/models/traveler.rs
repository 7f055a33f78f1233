// src/models/traveler.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::Category;

/// Preferred way of travelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    #[default]
    Solo,
    Group,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Solo => "SOLO",
            TravelMode::Group => "GROUP",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SOLO" => Ok(TravelMode::Solo),
            "GROUP" => Ok(TravelMode::Group),
            _ => Err(format!("Unknown travel mode: {}", s)),
        }
    }
}

/// Traveler profile owned by the account service
/// Coordinates are optional: a profile may never have been geolocated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Traveler {
    pub id: Uuid,
    pub name: String,
    pub home_city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub preferred_category: Option<Category>,
    #[serde(default)]
    pub travel_mode: TravelMode,
}

/// Request-level overrides for the traveler's profile
#[derive(Debug, Clone, Default)]
pub struct OriginOverrides {
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
