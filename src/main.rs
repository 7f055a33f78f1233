// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, catalog cache and start HTTP server

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use nomad_planner::config::{self, Config};
use nomad_planner::handlers;
use nomad_planner::services::{start_cleanup_task, CatalogCache, CostEstimator, TripPlanner};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.clone()
        } else {
            "info,actix_web=info,sqlx=warn".to_string()
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        anyhow::bail!("Configuration error: {}", e);
    }

    log::info!("Starting nomad-planner service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool
    let pool = config::init_db_pool(&config)
        .await
        .context("Failed to connect to database")?;

    // 5. Catalog snapshots shared by preview and commit
    let cache = Arc::new(CatalogCache::new(config.catalog_cache_ttl));
    start_cleanup_task(cache.clone(), config.catalog_cache_ttl);
    log::info!(
        "Initialized catalog cache (TTL: {}s)",
        config.catalog_cache_ttl
    );

    // 6. Planning engine
    let planner = TripPlanner::new(CostEstimator::from_config(&config));
    log::info!(
        "Cost model: {} per stop, {} pickup surcharge",
        config.base_cost_per_stop,
        config.pickup_surcharge
    );

    // 7. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    HttpServer::new(move || {
        App::new()
            // Application state
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::Data::new(planner))
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::plans_config)
            .configure(handlers::trips_config)
            .configure(handlers::places_config)
            .configure(handlers::groups_config)
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {}", server_addr))?
    .run()
    .await?;

    Ok(())
}
