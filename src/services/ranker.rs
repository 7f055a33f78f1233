// src/services/ranker.rs
// DOCUMENTATION: Candidate ranking for itinerary planning
// PURPOSE: Order points of interest by category match, proximity and rating

use crate::models::{Category, PlaceNearbyResponse, PlaceOfInterest};
use crate::services::distance::distance_between;
use geo_types::Point;
use std::cmp::Ordering;

/// Default search radius for nearby lookups
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 10.0;

/// Default number of nearby results
pub const DEFAULT_NEARBY_LIMIT: usize = 20;

pub struct PlaceCandidateRanker;

impl PlaceCandidateRanker {
    /// Rank candidates against an origin and an optional preferred category
    /// DOCUMENTATION: Composite ascending key:
    /// 1. 0 when the place matches the preferred category (or no preference), else 1
    /// 2. distance from origin
    /// 3. rating, descending
    ///
    /// The sort is stable, so places with equal keys keep catalog order.
    pub fn rank(
        places: &[PlaceOfInterest],
        origin: Point<f64>,
        preferred: Option<Category>,
    ) -> Vec<PlaceOfInterest> {
        let mut keyed: Vec<(u8, f64, &PlaceOfInterest)> = places
            .iter()
            .map(|p| {
                (
                    Self::category_rank(p.category, preferred),
                    distance_between(origin, p.point()),
                    p,
                )
            })
            .collect();

        keyed.sort_by(|a, b| Self::compare(a, b));

        log::debug!(
            "Ranked {} candidates (preference: {})",
            keyed.len(),
            preferred.map(|c| c.as_str()).unwrap_or("none")
        );

        keyed.into_iter().map(|(_, _, p)| p.clone()).collect()
    }

    /// Places within `radius_km` of the origin, ranked, truncated to `limit`
    /// DOCUMENTATION: Backs GET /places/nearby; each result carries its distance
    pub fn nearby(
        places: &[PlaceOfInterest],
        origin: Point<f64>,
        preferred: Option<Category>,
        radius_km: f64,
        limit: usize,
    ) -> Vec<PlaceNearbyResponse> {
        let mut keyed: Vec<(u8, f64, &PlaceOfInterest)> = places
            .iter()
            .map(|p| {
                (
                    Self::category_rank(p.category, preferred),
                    distance_between(origin, p.point()),
                    p,
                )
            })
            .filter(|(_, distance, _)| *distance <= radius_km)
            .collect();

        keyed.sort_by(|a, b| Self::compare(a, b));

        keyed
            .into_iter()
            .take(limit)
            .map(|(_, distance_km, p)| PlaceNearbyResponse {
                place: p.clone(),
                distance_km,
            })
            .collect()
    }

    fn category_rank(category: Category, preferred: Option<Category>) -> u8 {
        match preferred {
            Some(wanted) if wanted != category => 1,
            _ => 0,
        }
    }

    fn compare(a: &(u8, f64, &PlaceOfInterest), b: &(u8, f64, &PlaceOfInterest)) -> Ordering {
        a.0.cmp(&b.0)
            .then_with(|| a.1.total_cmp(&b.1))
            .then_with(|| b.2.rating.total_cmp(&a.2.rating))
    }
}
