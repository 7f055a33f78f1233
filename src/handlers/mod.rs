// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod groups;
pub mod health;
pub mod places;
pub mod plans;
pub mod trips;

pub use groups::config as groups_config;
pub use health::config as health_config;
pub use places::config as places_config;
pub use plans::config as plans_config;
pub use trips::config as trips_config;
