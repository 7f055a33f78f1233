// src/models/itinerary.rs
// DOCUMENTATION: Itinerary data structures
// PURPOSE: Time budgets, stops, plan identifiers and the request/response DTOs
// of the preview and commit endpoints

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use geo_types::Point;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::{Category, PlaceOfInterest, TravelMode};

/// Trip length selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeBudget {
    #[default]
    OneDay,
    TwoDay,
}

impl TimeBudget {
    /// Total number of stops across the whole trip
    pub fn total_stops(&self) -> usize {
        match self {
            TimeBudget::OneDay => 4,
            TimeBudget::TwoDay => 6,
        }
    }

    pub fn day_count(&self) -> usize {
        match self {
            TimeBudget::OneDay => 1,
            TimeBudget::TwoDay => 2,
        }
    }

    /// ceil(total_stops / day_count)
    pub fn per_day_slots(&self) -> usize {
        self.total_stops().div_ceil(self.day_count())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeBudget::OneDay => "ONE_DAY",
            TimeBudget::TwoDay => "TWO_DAY",
        }
    }
}

impl fmt::Display for TimeBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeBudget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ONE_DAY" => Ok(TimeBudget::OneDay),
            "TWO_DAY" => Ok(TimeBudget::TwoDay),
            _ => Err(format!("Unknown time budget: {}", s)),
        }
    }
}

/// One scheduled visit within a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryStop {
    /// 1-based day number
    pub day: u32,
    pub place: PlaceOfInterest,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// From the previous stop of the same day, or from the origin for a day's first stop
    pub distance_from_previous_km: f64,
}

/// Stable identifier of a plan option
/// DOCUMENTATION: Carried end-to-end between preview and commit instead of
/// the human label. Deserializes from either the tagged form
/// `{"kind":"per_category","category":"CULTURE"}` or a legacy label string
/// such as `"CULTURE Only"`. `Custom` marks a route over places the traveler
/// picked; previews never produce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", try_from = "PlanKeyRepr")]
pub enum PlanKey {
    PerCategory { category: Category },
    Hybrid,
    Custom,
}

impl PlanKey {
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PlanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanKey::PerCategory { category } => write!(f, "{} Only", category),
            PlanKey::Hybrid => f.write_str("Hybrid"),
            PlanKey::Custom => f.write_str("Custom"),
        }
    }
}

impl FromStr for PlanKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("hybrid") {
            return Ok(PlanKey::Hybrid);
        }
        if trimmed.eq_ignore_ascii_case("custom") {
            return Ok(PlanKey::Custom);
        }

        let (head, tail) = trimmed
            .rsplit_once(' ')
            .ok_or_else(|| format!("Unknown plan label: {}", s))?;
        if !tail.eq_ignore_ascii_case("only") {
            return Err(format!("Unknown plan label: {}", s));
        }

        let category = head
            .parse::<Category>()
            .map_err(|_| format!("Unknown plan label: {}", s))?;
        Ok(PlanKey::PerCategory { category })
    }
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum TaggedPlanKey {
    PerCategory { category: Category },
    Hybrid,
    Custom,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PlanKeyRepr {
    Tagged(TaggedPlanKey),
    Label(String),
}

impl TryFrom<PlanKeyRepr> for PlanKey {
    type Error = String;

    fn try_from(repr: PlanKeyRepr) -> Result<Self, Self::Error> {
        match repr {
            PlanKeyRepr::Tagged(TaggedPlanKey::PerCategory { category }) => {
                Ok(PlanKey::PerCategory { category })
            }
            PlanKeyRepr::Tagged(TaggedPlanKey::Hybrid) => Ok(PlanKey::Hybrid),
            PlanKeyRepr::Tagged(TaggedPlanKey::Custom) => Ok(PlanKey::Custom),
            PlanKeyRepr::Label(label) => label.parse(),
        }
    }
}

/// A named itinerary option
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanOption {
    pub key: PlanKey,
    pub label: String,
    pub stops: Vec<ItineraryStop>,
}

impl PlanOption {
    pub fn new(key: PlanKey, stops: Vec<ItineraryStop>) -> Self {
        Self {
            key,
            label: key.label(),
            stops,
        }
    }

    /// Number of distinct days covered by the stops
    pub fn day_count(&self) -> u32 {
        self.stops.iter().map(|s| s.day).max().unwrap_or(0)
    }

    /// Straight-line route preview as GeoJSON
    /// DOCUMENTATION: One LineString per day (origin first, then the stops in
    /// visiting order) and one Point per stop carrying its schedule
    pub fn to_geojson(&self, origin: Point<f64>) -> FeatureCollection {
        let mut features = Vec::new();

        for day in 1..=self.day_count() {
            let mut line = vec![vec![origin.x(), origin.y()]];
            line.extend(
                self.stops
                    .iter()
                    .filter(|s| s.day == day)
                    .map(|s| vec![s.place.longitude, s.place.latitude]),
            );

            let mut properties = JsonObject::new();
            properties.insert("day".to_string(), json!(day));
            features.push(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::LineString(line))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            });
        }

        for stop in &self.stops {
            let mut properties = JsonObject::new();
            properties.insert("day".to_string(), json!(stop.day));
            properties.insert("name".to_string(), json!(stop.place.name));
            properties.insert("category".to_string(), json!(stop.place.category));
            properties.insert(
                "start_time".to_string(),
                json!(stop.start_time.format("%H:%M").to_string()),
            );
            properties.insert(
                "end_time".to_string(),
                json!(stop.end_time.format("%H:%M").to_string()),
            );
            features.push(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![
                    stop.place.longitude,
                    stop.place.latitude,
                ]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            });
        }

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

/// Request DTO for POST /plans/preview
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PlanPreviewRequest {
    pub traveler_id: Uuid,

    /// Overrides the traveler's home city
    #[validate(length(min = 1, max = 255))]
    pub city: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    /// Accepted like on commit; previews always cover every category
    pub category: Option<Category>,

    #[serde(default)]
    pub time_budget: TimeBudget,

    #[serde(default)]
    pub pickup_required: bool,

    /// Return a GeoJSON route preview with each option
    #[serde(default)]
    pub include_geojson: bool,
}

/// Preview option as returned over HTTP
#[derive(Debug, Serialize)]
pub struct PlanOptionResponse {
    #[serde(flatten)]
    pub option: PlanOption,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geojson: Option<FeatureCollection>,
}

/// Response DTO for POST /plans/preview
#[derive(Debug, Serialize)]
pub struct PlanPreviewResponse {
    pub city: String,
    pub plan_options: Vec<PlanOptionResponse>,
    pub estimated_cost: Decimal,
}

/// Request DTO for POST /trips
/// DOCUMENTATION: Commits one previewed plan; the plan is re-derived from
/// the same inputs and identified by its PlanKey
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TripCreateRequest {
    pub traveler_id: Uuid,

    #[validate(length(min = 1, max = 255))]
    pub city: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    /// Interest used for group matching; defaults to the profile's preference
    pub category: Option<Category>,

    #[serde(default)]
    pub time_budget: TimeBudget,

    /// Defaults to the profile's travel mode
    pub travel_mode: Option<TravelMode>,

    #[serde(default)]
    pub pickup_required: bool,

    pub travel_date: Option<NaiveDate>,

    pub selected_plan: PlanKey,
}

/// Request DTO for POST /trips/custom
/// DOCUMENTATION: A one-day solo trip over places the traveler picked
/// themselves. Every place is kept and ordered as a nearest neighbour route.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomTripRequest {
    pub traveler_id: Uuid,

    #[validate(length(min = 1, max = 7))]
    pub place_ids: Vec<Uuid>,

    /// Defaults to the first stop's city
    #[validate(length(min = 1, max = 255))]
    pub city: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    pub travel_date: Option<NaiveDate>,
}

/// Response DTO for trip endpoints
#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub trip_id: Uuid,
    pub traveler_id: Uuid,
    pub city: String,
    pub time_budget: TimeBudget,
    pub travel_mode: TravelMode,
    pub travel_date: Option<NaiveDate>,
    pub plan: PlanOption,
    pub group_id: Option<Uuid>,
    pub group_size: Option<i64>,
    pub estimated_cost: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Query parameters for GET /trips/cost
#[derive(Debug, Deserialize)]
pub struct CostQuery {
    pub total_stops: u32,
    #[serde(default)]
    pub pickup: bool,
}
