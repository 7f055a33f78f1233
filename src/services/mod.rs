// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export planning engine components

pub mod catalog_cache;
pub mod cost;
pub mod distance;
pub mod group_pool;
pub mod itinerary_builder;
pub mod plan_preview;
pub mod ranker;
pub mod trip_planner;
pub mod trip_service;

#[cfg(test)]
pub(crate) mod fixtures;

pub use catalog_cache::*;
pub use cost::*;
pub use distance::*;
pub use group_pool::*;
pub use itinerary_builder::*;
pub use plan_preview::*;
pub use ranker::*;
pub use trip_planner::*;
pub use trip_service::*;
