// src/services/plan_preview.rs
// DOCUMENTATION: Multi-category plan composition
// PURPOSE: Generate one plan option per category present in the catalog plus
// a blended hybrid option, and re-derive any single option by its key

use crate::errors::PlannerError;
use crate::models::{Category, PlaceOfInterest, PlanKey, PlanOption, TimeBudget};
use crate::services::itinerary_builder::ItineraryBuilder;
use crate::services::ranker::PlaceCandidateRanker;
use geo_types::Point;

/// Composes ranking and route building over one catalog snapshot
/// DOCUMENTATION: Output is a pure function of (catalog, origin, time budget),
/// so a plan previewed earlier can be rebuilt at commit time from its key.
pub struct PlanPreviewOrchestrator<'a> {
    catalog: &'a [PlaceOfInterest],
    origin: Point<f64>,
    time_budget: TimeBudget,
}

impl<'a> PlanPreviewOrchestrator<'a> {
    pub fn new(catalog: &'a [PlaceOfInterest], origin: Point<f64>, time_budget: TimeBudget) -> Self {
        Self {
            catalog,
            origin,
            time_budget,
        }
    }

    /// How many top candidates each category contributes to the hybrid mix
    pub fn hybrid_cap(time_budget: TimeBudget) -> usize {
        time_budget
            .total_stops()
            .div_ceil(Category::ALL.len())
            .max(1)
    }

    /// Every available option: categories in catalog order, hybrid last
    /// Categories without candidates produce no option.
    pub fn preview(&self) -> Vec<PlanOption> {
        let options: Vec<PlanOption> = self
            .keys()
            .into_iter()
            .filter_map(|key| self.try_build(key))
            .collect();

        log::debug!(
            "Generated {} plan option(s) from {} candidates",
            options.len(),
            self.catalog.len()
        );

        options
    }

    /// Re-derive a single option by key
    pub fn build(&self, key: PlanKey) -> Result<PlanOption, PlannerError> {
        self.try_build(key).ok_or_else(|| {
            log::warn!("Plan '{}' cannot be built from the current catalog", key);
            PlannerError::UnknownPlanLabel(key.label())
        })
    }

    fn keys(&self) -> Vec<PlanKey> {
        let mut keys: Vec<PlanKey> = Category::ALL
            .iter()
            .filter(|c| self.catalog.iter().any(|p| p.category == **c))
            .map(|c| PlanKey::PerCategory { category: *c })
            .collect();
        keys.push(PlanKey::Hybrid);
        keys
    }

    fn try_build(&self, key: PlanKey) -> Option<PlanOption> {
        let ranked = match key {
            PlanKey::PerCategory { category } => {
                let subset = self.subset(category);
                if subset.is_empty() {
                    return None;
                }
                PlaceCandidateRanker::rank(&subset, self.origin, Some(category))
            }
            PlanKey::Hybrid => {
                let blended = self.hybrid_candidates();
                PlaceCandidateRanker::rank(&blended, self.origin, None)
            }
            // Custom routes come from the traveler's own picks, never from the catalog
            PlanKey::Custom => return None,
        };

        let stops = ItineraryBuilder::build(
            &ranked,
            self.time_budget.total_stops(),
            self.time_budget.per_day_slots(),
            self.origin,
        );

        if stops.is_empty() {
            return None;
        }
        Some(PlanOption::new(key, stops))
    }

    fn subset(&self, category: Category) -> Vec<PlaceOfInterest> {
        self.catalog
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect()
    }

    /// Top candidates of every category, ranked without preference, concatenated
    fn hybrid_candidates(&self) -> Vec<PlaceOfInterest> {
        let cap = Self::hybrid_cap(self.time_budget);
        Category::ALL
            .iter()
            .flat_map(|c| {
                PlaceCandidateRanker::rank(&self.subset(*c), self.origin, None)
                    .into_iter()
                    .take(cap)
            })
            .collect()
    }
}
