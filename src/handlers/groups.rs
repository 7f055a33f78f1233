// src/handlers/groups.rs
// DOCUMENTATION: HTTP handlers for group pools
// PURPOSE: Assign travelers to shared-trip cohorts, report pool size and members

use crate::errors::PlannerError;
use crate::models::GroupAssignRequest;
use crate::services::TripService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

/// POST /groups/assign
/// Responds with the joined pool, or null when no travel date was given
pub async fn assign_group(
    pool: web::Data<PgPool>,
    req: web::Json<GroupAssignRequest>,
) -> Result<impl Responder, PlannerError> {
    let group = TripService::assign_group(pool.get_ref(), req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(group))
}

/// GET /groups/{id}
pub async fn get_group(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, PlannerError> {
    let group = TripService::get_group(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(group))
}

/// GET /groups/{id}/members
pub async fn list_members(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, PlannerError> {
    let members = TripService::group_members(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(members))
}

/// Configuration for group routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/groups")
            .route("/assign", web::post().to(assign_group))
            .route("/{id}", web::get().to(get_group))
            .route("/{id}/members", web::get().to(list_members)),
    );
}
