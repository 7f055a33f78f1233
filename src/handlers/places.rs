// src/handlers/places.rs
// DOCUMENTATION: HTTP handlers for catalog lookups
// PURPOSE: Nearby points of interest around a coordinate

use crate::errors::PlannerError;
use crate::models::NearbyQuery;
use crate::services::{CatalogCache, TripService};
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

/// GET /places/nearby?lat=..&lon=..&city=..&category=..&radius_km=..&limit=..
pub async fn nearby_places(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<CatalogCache>>,
    query: web::Query<NearbyQuery>,
) -> Result<impl Responder, PlannerError> {
    if let Err(e) = query.validate() {
        return Err(PlannerError::ValidationError(e.to_string()));
    }

    let places = TripService::nearby(pool.get_ref(), cache.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(places))
}

/// Configuration for place routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/places").route("/nearby", web::get().to(nearby_places)));
}
