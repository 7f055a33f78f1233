// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export repository components

pub mod group_repository;
pub mod place_repository;
pub mod traveler_repository;
pub mod trip_repository;

pub use group_repository::*;
pub use place_repository::*;
pub use traveler_repository::*;
pub use trip_repository::*;
