// src/services/trip_planner.rs
// DOCUMENTATION: Planning engine entry point
// PURPOSE: Resolve where a traveler starts, then preview, re-derive and price
// plans over a catalog snapshot

use crate::errors::PlannerError;
use crate::models::{OriginOverrides, PlaceOfInterest, PlanKey, PlanOption, TimeBudget, Traveler};
use crate::services::cost::CostEstimator;
use crate::services::itinerary_builder::{ItineraryBuilder, MAX_CUSTOM_STOPS};
use crate::services::plan_preview::PlanPreviewOrchestrator;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use geo_types::Point;
use rust_decimal::Decimal;

/// Result of a preview request
#[derive(Debug, Clone, PartialEq)]
pub struct PlanPreview {
    pub city: String,
    pub origin: Point<f64>,
    pub plan_options: Vec<PlanOption>,
    pub estimated_cost: Decimal,
}

/// Planning engine
/// DOCUMENTATION: Stateless apart from the cost constants. Every call takes
/// the catalog explicitly so preview and commit can share one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct TripPlanner {
    cost: CostEstimator,
}

impl TripPlanner {
    pub fn new(cost: CostEstimator) -> Self {
        Self { cost }
    }

    /// City to plan in: the request override wins over the profile
    pub fn resolve_city(
        traveler: &Traveler,
        overrides: &OriginOverrides,
    ) -> Result<String, PlannerError> {
        let non_blank = |c: &Option<String>| {
            c.as_deref().map(str::trim).filter(|c| !c.is_empty()).map(str::to_string)
        };

        non_blank(&overrides.city)
            .or_else(|| non_blank(&traveler.home_city))
            .ok_or_else(|| {
                PlannerError::InvalidInput(format!("No city given and traveler {} has no home city", traveler.id))
            })
    }

    /// Starting point as (lon, lat); each coordinate falls back to the profile
    pub fn resolve_origin(
        traveler: &Traveler,
        overrides: &OriginOverrides,
    ) -> Result<Point<f64>, PlannerError> {
        let lat = overrides.latitude.or(traveler.latitude);
        let lon = overrides.longitude.or(traveler.longitude);

        match (lat, lon) {
            (Some(lat), Some(lon)) => Ok(Point::new(lon, lat)),
            _ => {
                log::warn!("Traveler {} has no usable coordinates", traveler.id);
                Err(PlannerError::UnresolvedOrigin)
            }
        }
    }

    /// Every plan option for the traveler plus the estimated trip cost
    pub fn preview_plans(
        &self,
        traveler: &Traveler,
        overrides: &OriginOverrides,
        time_budget: TimeBudget,
        pickup_requested: bool,
        catalog: &[PlaceOfInterest],
    ) -> Result<PlanPreview, PlannerError> {
        let city = Self::resolve_city(traveler, overrides)?;
        let origin = Self::resolve_origin(traveler, overrides)?;

        if catalog.is_empty() {
            return Err(PlannerError::EmptyCatalog(city));
        }

        let plan_options = PlanPreviewOrchestrator::new(catalog, origin, time_budget).preview();

        log::debug!(
            "Previewed {} option(s) for traveler {} in {} ({})",
            plan_options.len(),
            traveler.id,
            city,
            time_budget
        );

        Ok(PlanPreview {
            city,
            origin,
            plan_options,
            estimated_cost: self.estimate_cost(time_budget.total_stops(), pickup_requested),
        })
    }

    /// Re-derive the option a traveler picked during preview
    pub fn build_selected_plan(
        &self,
        traveler: &Traveler,
        overrides: &OriginOverrides,
        key: PlanKey,
        time_budget: TimeBudget,
        catalog: &[PlaceOfInterest],
    ) -> Result<PlanOption, PlannerError> {
        let city = Self::resolve_city(traveler, overrides)?;
        let origin = Self::resolve_origin(traveler, overrides)?;

        if catalog.is_empty() {
            return Err(PlannerError::EmptyCatalog(city));
        }

        PlanPreviewOrchestrator::new(catalog, origin, time_budget).build(key)
    }

    /// One-day route over places the traveler picked, keeping all of them
    pub fn build_custom_plan(
        traveler: &Traveler,
        overrides: &OriginOverrides,
        places: &[PlaceOfInterest],
    ) -> Result<PlanOption, PlannerError> {
        if places.is_empty() {
            return Err(PlannerError::InvalidInput("At least one place is required".to_string()));
        }
        if places.len() > MAX_CUSTOM_STOPS {
            return Err(PlannerError::InvalidInput(format!(
                "A custom trip holds at most {} places",
                MAX_CUSTOM_STOPS
            )));
        }

        let origin = Self::resolve_origin(traveler, overrides)?;
        Ok(PlanOption::new(
            PlanKey::Custom,
            ItineraryBuilder::build_custom(places, origin),
        ))
    }

    /// City of a custom trip: request override, then the first stop, then the profile
    pub fn resolve_custom_city(
        traveler: &Traveler,
        overrides: &OriginOverrides,
        plan: &PlanOption,
    ) -> Result<String, PlannerError> {
        let requested = overrides.city.as_deref().map(str::trim).filter(|c| !c.is_empty());

        match requested.or_else(|| plan.stops.first().map(|s| s.place.city.as_str())) {
            Some(city) => Ok(city.to_string()),
            None => Self::resolve_city(traveler, overrides),
        }
    }

    pub fn estimate_cost(&self, total_stops: usize, pickup_requested: bool) -> Decimal {
        self.cost.estimate(total_stops, pickup_requested)
    }

    /// Next Saturday strictly after `today`
    pub fn next_weekend_date(today: NaiveDate) -> NaiveDate {
        let saturday = Weekday::Sat.num_days_from_monday() as i64;
        let current = today.weekday().num_days_from_monday() as i64;
        let mut days = (saturday - current).rem_euclid(7);
        if days == 0 {
            days = 7;
        }
        today + Duration::days(days)
    }
}
