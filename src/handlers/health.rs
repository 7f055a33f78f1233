// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Simple endpoint to verify service status and catalog cache usage

use crate::services::CatalogCache;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use std::sync::Arc;

pub async fn health_check(cache: Option<web::Data<Arc<CatalogCache>>>) -> impl Responder {
    let catalog_cache = match cache {
        Some(cache) => Some(cache.stats().await),
        None => None,
    };

    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "nomad-planner",
        "version": env!("CARGO_PKG_VERSION"),
        "catalog_cache": catalog_cache
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::services::fixtures::place_km_north;
    use actix_web::{test, App};

    #[actix_rt::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().configure(config)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "nomad-planner");
        assert!(body["catalog_cache"].is_null());
    }

    #[actix_rt::test]
    async fn test_health_check_reports_cache_stats() {
        let cache = Arc::new(CatalogCache::new(60));
        cache
            .insert("Jaipur", vec![place_km_north("fort", Category::Culture, 4.5, 1.0)])
            .await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(cache.clone()))
                .configure(config),
        )
        .await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["catalog_cache"]["total_entries"], 1);
        assert_eq!(body["catalog_cache"]["active_entries"], 1);
    }
}
