// src/handlers/plans.rs
// DOCUMENTATION: HTTP handlers for plan previews
// PURPOSE: Parse requests, call services, return responses

use crate::errors::PlannerError;
use crate::models::PlanPreviewRequest;
use crate::services::{CatalogCache, TripPlanner, TripService};
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

/// POST /plans/preview
/// Every plan option for a traveler plus the estimated cost
pub async fn preview_plans(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<CatalogCache>>,
    planner: web::Data<TripPlanner>,
    req: web::Json<PlanPreviewRequest>,
) -> Result<impl Responder, PlannerError> {
    if let Err(e) = req.validate() {
        return Err(PlannerError::ValidationError(e.to_string()));
    }

    let preview = TripService::preview(
        pool.get_ref(),
        cache.get_ref(),
        planner.get_ref(),
        req.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(preview))
}

/// Configuration for plan routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/plans").route("/preview", web::post().to(preview_plans)));
}
