// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod group;
pub mod itinerary;
pub mod place;
pub mod traveler;

pub use group::*;
pub use itinerary::*;
pub use place::*;
pub use traveler::*;
