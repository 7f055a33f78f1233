// src/lib.rs
// DOCUMENTATION: Library root
// PURPOSE: Planning engine (models + services) and the service shell around
// it (config, repositories, HTTP handlers)

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;

pub use errors::PlannerError;
pub use services::{CostEstimator, GroupPoolRegistry, TripPlanner};
