// src/services/trip_service.rs
// DOCUMENTATION: Business logic for the planning endpoints
// PURPOSE: Intermediary between handlers, the planning engine and the
// repositories (catalog loading, preview, commit, lookups)

use crate::db::{GroupRepository, NewTrip, PlaceRepository, TravelerRepository, TripRepository};
use crate::errors::PlannerError;
use crate::models::{
    Category, CustomTripRequest, GroupAssignRequest, GroupMember, GroupResponse, NearbyQuery,
    OriginOverrides, PlaceNearbyResponse, PlanKey, PlanOptionResponse, PlanPreviewRequest,
    PlanPreviewResponse, TimeBudget, Traveler, TravelMode, TripCreateRequest, TripResponse,
};
use crate::services::catalog_cache::{CatalogCache, CatalogSnapshot};
use crate::services::group_pool::GroupPoolCoordinator;
use crate::services::ranker::{PlaceCandidateRanker, DEFAULT_NEARBY_LIMIT, DEFAULT_NEARBY_RADIUS_KM};
use crate::services::trip_planner::TripPlanner;
use chrono::{NaiveDate, Utc};
use geo_types::Point;
use sqlx::PgPool;
use uuid::Uuid;

/// Upper bound on nearby results
pub const MAX_NEARBY_LIMIT: usize = 100;

pub struct TripService;

impl TripService {
    /// Catalog snapshot for a city, loaded through the cache
    /// An empty catalog is EmptyCatalog and is never cached.
    pub async fn catalog(
        pool: &PgPool,
        cache: &CatalogCache,
        city: &str,
    ) -> Result<CatalogSnapshot, PlannerError> {
        if let Some(snapshot) = cache.get(city).await {
            return Ok(snapshot);
        }

        let places = PlaceRepository::find_by_city(pool, city).await?;
        if places.is_empty() {
            log::warn!("No places found for city {}", city);
            return Err(PlannerError::EmptyCatalog(city.to_string()));
        }

        Ok(cache.insert(city, places).await)
    }

    /// Preview every plan option for a traveler
    pub async fn preview(
        pool: &PgPool,
        cache: &CatalogCache,
        planner: &TripPlanner,
        req: PlanPreviewRequest,
    ) -> Result<PlanPreviewResponse, PlannerError> {
        let traveler = TravelerRepository::get_by_id(pool, req.traveler_id).await?;
        let overrides = OriginOverrides {
            city: req.city,
            latitude: req.latitude,
            longitude: req.longitude,
        };

        let city = TripPlanner::resolve_city(&traveler, &overrides)?;
        let catalog = Self::catalog(pool, cache, &city).await?;

        let preview = planner.preview_plans(
            &traveler,
            &overrides,
            req.time_budget,
            req.pickup_required,
            &catalog,
        )?;

        let origin = preview.origin;
        let plan_options = preview
            .plan_options
            .into_iter()
            .map(|option| PlanOptionResponse {
                geojson: req.include_geojson.then(|| option.to_geojson(origin)),
                option,
            })
            .collect();

        Ok(PlanPreviewResponse {
            city: preview.city,
            plan_options,
            estimated_cost: preview.estimated_cost,
        })
    }

    /// Commit a previewed plan
    /// DOCUMENTATION: The selected plan is re-derived from the same catalog
    /// snapshot. Trip, stops and (for group travel) pool membership are
    /// written in one transaction.
    pub async fn commit(
        pool: &PgPool,
        cache: &CatalogCache,
        planner: &TripPlanner,
        req: TripCreateRequest,
    ) -> Result<TripResponse, PlannerError> {
        let traveler = TravelerRepository::get_by_id(pool, req.traveler_id).await?;
        let overrides = OriginOverrides {
            city: req.city.clone(),
            latitude: req.latitude,
            longitude: req.longitude,
        };

        let city = TripPlanner::resolve_city(&traveler, &overrides)?;
        let catalog = Self::catalog(pool, cache, &city).await?;
        let plan = planner.build_selected_plan(
            &traveler,
            &overrides,
            req.selected_plan,
            req.time_budget,
            &catalog,
        )?;

        let travel_mode = req.travel_mode.unwrap_or(traveler.travel_mode);
        let travel_date = Self::travel_date_for(req.travel_date, Utc::now().date_naive());
        let group_category = match travel_mode {
            TravelMode::Group => Some(Self::group_category(req.category, &traveler, req.selected_plan)?),
            TravelMode::Solo => None,
        };
        let estimated_cost = planner.estimate_cost(req.time_budget.total_stops(), req.pickup_required);

        let trip_id = Uuid::new_v4();
        let new_trip = NewTrip {
            id: trip_id,
            traveler_id: traveler.id,
            city: &city,
            time_budget: req.time_budget,
            travel_mode,
            travel_date: Some(travel_date),
            pickup_required: req.pickup_required,
            plan: &plan,
            estimated_cost,
        };

        let mut tx = pool.begin().await.map_err(|e| {
            log::error!("Failed to begin transaction: {}", e);
            PlannerError::DatabaseError(e.to_string())
        })?;

        let created_at = TripRepository::insert(&mut *tx, &new_trip).await?;

        let group = match group_category.and_then(|category| {
            GroupPoolCoordinator::pool_key(&city, category, req.time_budget, Some(travel_date))
        }) {
            Some(key) => {
                let (group, size) =
                    GroupRepository::assign_and_join(&mut *tx, &key, traveler.id, Some(trip_id)).await?;
                TripRepository::set_group(&mut *tx, trip_id, group.id).await?;
                Some((group.id, size))
            }
            None => None,
        };

        tx.commit().await.map_err(|e| {
            log::error!("Failed to commit trip {}: {}", trip_id, e);
            PlannerError::DatabaseError(e.to_string())
        })?;

        log::info!(
            "Committed trip {} for traveler {}: {} ({} stops, group {:?})",
            trip_id,
            traveler.id,
            plan.label,
            plan.stops.len(),
            group.map(|(id, _)| id)
        );

        Ok(TripResponse {
            trip_id,
            traveler_id: traveler.id,
            city,
            time_budget: req.time_budget,
            travel_mode,
            travel_date: Some(travel_date),
            plan,
            group_id: group.map(|(id, _)| id),
            group_size: group.map(|(_, size)| size),
            estimated_cost,
            created_at,
        })
    }

    /// Commit a one-day solo trip over places the traveler picked
    /// DOCUMENTATION: Unknown or inactive place ids are InvalidInput. The
    /// places are routed nearest neighbour first from the origin and priced
    /// like any trip of that many stops without pickup.
    pub async fn commit_custom(
        pool: &PgPool,
        planner: &TripPlanner,
        req: CustomTripRequest,
    ) -> Result<TripResponse, PlannerError> {
        let traveler = TravelerRepository::get_by_id(pool, req.traveler_id).await?;
        let overrides = OriginOverrides {
            city: req.city,
            latitude: req.latitude,
            longitude: req.longitude,
        };

        let places = PlaceRepository::find_by_ids(pool, &req.place_ids).await?;
        let plan = TripPlanner::build_custom_plan(&traveler, &overrides, &places)?;
        let city = TripPlanner::resolve_custom_city(&traveler, &overrides, &plan)?;

        let travel_date = Self::travel_date_for(req.travel_date, Utc::now().date_naive());
        let estimated_cost = planner.estimate_cost(plan.stops.len(), false);

        let trip_id = Uuid::new_v4();
        let new_trip = NewTrip {
            id: trip_id,
            traveler_id: traveler.id,
            city: &city,
            time_budget: TimeBudget::OneDay,
            travel_mode: TravelMode::Solo,
            travel_date: Some(travel_date),
            pickup_required: false,
            plan: &plan,
            estimated_cost,
        };

        let mut tx = pool.begin().await.map_err(|e| {
            log::error!("Failed to begin transaction: {}", e);
            PlannerError::DatabaseError(e.to_string())
        })?;

        let created_at = TripRepository::insert(&mut *tx, &new_trip).await?;

        tx.commit().await.map_err(|e| {
            log::error!("Failed to commit trip {}: {}", trip_id, e);
            PlannerError::DatabaseError(e.to_string())
        })?;

        log::info!(
            "Committed custom trip {} for traveler {} in {} ({} stops)",
            trip_id,
            traveler.id,
            city,
            plan.stops.len()
        );

        Ok(TripResponse {
            trip_id,
            traveler_id: traveler.id,
            city,
            time_budget: TimeBudget::OneDay,
            travel_mode: TravelMode::Solo,
            travel_date: Some(travel_date),
            plan,
            group_id: None,
            group_size: None,
            estimated_cost,
            created_at,
        })
    }

    pub async fn get_trip(pool: &PgPool, id: Uuid) -> Result<TripResponse, PlannerError> {
        TripRepository::get_by_id(pool, id).await
    }

    pub async fn trips_for_traveler(pool: &PgPool, traveler_id: Uuid) -> Result<Vec<TripResponse>, PlannerError> {
        TripRepository::list_by_traveler(pool, traveler_id).await
    }

    /// Places near a point, optionally restricted to a city
    pub async fn nearby(
        pool: &PgPool,
        cache: &CatalogCache,
        query: NearbyQuery,
    ) -> Result<Vec<PlaceNearbyResponse>, PlannerError> {
        let catalog = match query.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(city) => match Self::catalog(pool, cache, city).await {
                Ok(snapshot) => snapshot,
                Err(PlannerError::EmptyCatalog(_)) => return Ok(Vec::new()),
                Err(e) => return Err(e),
            },
            None => PlaceRepository::find_all(pool).await?.into(),
        };

        let radius_km = query.radius_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
        let limit = query.limit.unwrap_or(DEFAULT_NEARBY_LIMIT).min(MAX_NEARBY_LIMIT);

        Ok(PlaceCandidateRanker::nearby(
            &catalog,
            Point::new(query.lon, query.lat),
            query.category,
            radius_km,
            limit,
        ))
    }

    /// Standalone group assignment; None when no travel date is given
    pub async fn assign_group(
        pool: &PgPool,
        req: GroupAssignRequest,
    ) -> Result<Option<GroupResponse>, PlannerError> {
        if req.city.trim().is_empty() {
            return Err(PlannerError::InvalidInput("city must not be empty".to_string()));
        }

        let Some(key) =
            GroupPoolCoordinator::pool_key(&req.city, req.category, req.time_budget, req.travel_date)
        else {
            log::debug!("No travel date for traveler {} - skipping group assignment", req.traveler_id);
            return Ok(None);
        };

        let (group, size) = GroupRepository::assign(pool, &key, req.traveler_id).await?;
        Ok(Some(GroupResponse { group, size }))
    }

    pub async fn get_group(pool: &PgPool, id: Uuid) -> Result<GroupResponse, PlannerError> {
        GroupRepository::get_with_size(pool, id).await
    }

    pub async fn group_members(pool: &PgPool, id: Uuid) -> Result<Vec<GroupMember>, PlannerError> {
        GroupRepository::members(pool, id).await
    }

    /// Every committed trip gets a date, defaulting to the coming weekend
    pub fn travel_date_for(requested: Option<NaiveDate>, today: NaiveDate) -> NaiveDate {
        requested.unwrap_or_else(|| TripPlanner::next_weekend_date(today))
    }

    /// Interest used to match a group: request, then profile, then the plan's category
    pub fn group_category(
        requested: Option<Category>,
        traveler: &Traveler,
        selected_plan: PlanKey,
    ) -> Result<Category, PlannerError> {
        requested
            .or(traveler.preferred_category)
            .or(match selected_plan {
                PlanKey::PerCategory { category } => Some(category),
                PlanKey::Hybrid | PlanKey::Custom => None,
            })
            .ok_or_else(|| {
                PlannerError::InvalidInput("category is required for group travel".to_string())
            })
    }
}
