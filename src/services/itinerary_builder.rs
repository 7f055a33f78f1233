// src/services/itinerary_builder.rs
// DOCUMENTATION: Day-partitioned route construction
// PURPOSE: Turn a ranked candidate list into timed, per-day stop sequences

use crate::models::{Category, ItineraryStop, PlaceOfInterest};
use crate::services::distance::distance_between;
use chrono::{Duration, NaiveTime};
use geo_types::Point;

/// Hour at which every day's first stop begins
pub const DAY_START_HOUR: u32 = 9;

/// Length of every visit
pub const STOP_DURATION_HOURS: i64 = 2;

/// Most places a custom route may hold; the last visit ends at 23:00
pub const MAX_CUSTOM_STOPS: usize = 7;

pub struct ItineraryBuilder;

impl ItineraryBuilder {
    /// Build a flat, day-ordered itinerary from ranked candidates
    /// DOCUMENTATION: Algorithm
    /// 1. Keep the first min(total_stops, len) ranked candidates as the pool
    /// 2. day_count = ceil(total_stops / per_day_slots)
    /// 3. Each day starts at the origin and repeatedly takes the nearest
    ///    remaining pool entry (ties go to pool order) until the day is full
    ///    or the pool is empty
    /// 4. A nightlife stop that is not already last is moved to the end of its day
    /// 5. Stops run back to back in 2 hour windows from 09:00
    ///
    /// An empty pool yields an empty itinerary; callers decide how to report it.
    pub fn build(
        ranked: &[PlaceOfInterest],
        total_stops: usize,
        per_day_slots: usize,
        origin: Point<f64>,
    ) -> Vec<ItineraryStop> {
        let take = total_stops.min(ranked.len());
        if take == 0 || per_day_slots == 0 {
            return Vec::new();
        }

        let mut pool: Vec<&PlaceOfInterest> = ranked[..take].iter().collect();
        let day_count = total_stops.div_ceil(per_day_slots);
        let mut stops = Vec::with_capacity(take);

        for day in 1..=day_count {
            let mut day_places = Vec::with_capacity(per_day_slots);
            let mut current = origin;

            while day_places.len() < per_day_slots {
                let Some(idx) = Self::nearest(current, &pool) else {
                    break;
                };
                let next = pool.remove(idx);
                current = next.point();
                day_places.push(next);
            }

            Self::move_closing_stop_last(&mut day_places);
            stops.extend(Self::schedule_day(day as u32, &day_places, origin));
        }

        log::debug!(
            "Built itinerary: {} stops over {} day(s) from {} candidates",
            stops.len(),
            day_count,
            ranked.len()
        );

        stops
    }

    /// Order an explicit set of places as a single day
    /// DOCUMENTATION: Every place is kept. The route is the same nearest
    /// neighbour walk from the origin with the same 2 hour slots and distance
    /// chain; only the ranking and truncation steps are skipped.
    pub fn build_custom(places: &[PlaceOfInterest], origin: Point<f64>) -> Vec<ItineraryStop> {
        Self::build(places, places.len(), places.len(), origin)
    }

    /// Index of the pool entry closest to `from`; the first one wins a tie
    fn nearest(from: Point<f64>, pool: &[&PlaceOfInterest]) -> Option<usize> {
        pool.iter()
            .enumerate()
            .map(|(idx, p)| (idx, distance_between(from, p.point())))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(idx, _)| idx)
    }

    /// Whether a visit of this category belongs at the end of the day
    fn closes_the_day(category: Category) -> bool {
        match category {
            Category::Nightlife => true,
            Category::Nature
            | Category::Culture
            | Category::Food
            | Category::Shopping
            | Category::Relaxation
            | Category::Adventure => false,
        }
    }

    /// Move the first day-closing stop to the end; a day holds at most one
    fn move_closing_stop_last(day_places: &mut Vec<&PlaceOfInterest>) {
        let last = day_places.len().saturating_sub(1);
        if let Some(idx) = day_places
            .iter()
            .position(|p| Self::closes_the_day(p.category))
        {
            if idx != last {
                let closing = day_places.remove(idx);
                day_places.push(closing);
            }
        }
    }

    fn schedule_day(
        day: u32,
        day_places: &[&PlaceOfInterest],
        origin: Point<f64>,
    ) -> Vec<ItineraryStop> {
        let mut start = NaiveTime::from_hms_opt(DAY_START_HOUR, 0, 0).unwrap_or_default();
        let mut previous = origin;

        day_places
            .iter()
            .map(|place| {
                let end = start + Duration::hours(STOP_DURATION_HOURS);
                let stop = ItineraryStop {
                    day,
                    place: (*place).clone(),
                    start_time: start,
                    end_time: end,
                    distance_from_previous_km: distance_between(previous, place.point()),
                };
                start = end;
                previous = place.point();
                stop
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::distance::haversine_km;
    use crate::services::fixtures::{origin, place_km_east, place_km_north, ORIGIN_LAT, ORIGIN_LON};
    use crate::services::ranker::PlaceCandidateRanker;

    fn hm(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn names(stops: &[ItineraryStop]) -> Vec<&str> {
        stops.iter().map(|s| s.place.name.as_str()).collect()
    }

    #[test]
    fn test_empty_pool_yields_empty_itinerary() {
        assert!(ItineraryBuilder::build(&[], 4, 4, origin()).is_empty());

        let places = vec![place_km_north("a", Category::Food, 4.0, 1.0)];
        assert!(ItineraryBuilder::build(&places, 0, 4, origin()).is_empty());
        assert!(ItineraryBuilder::build(&places, 4, 0, origin()).is_empty());
    }

    #[test]
    fn test_rivertown_one_day_scenario() {
        let catalog = vec![
            place_km_north("culture-1", Category::Culture, 4.0, 1.0),
            place_km_north("culture-2", Category::Culture, 4.5, 2.0),
            place_km_north("culture-3", Category::Culture, 3.9, 3.0),
            place_km_north("food-0.5", Category::Food, 4.2, 0.5),
            place_km_north("food-4", Category::Food, 4.9, 4.0),
        ];

        let ranked = PlaceCandidateRanker::rank(&catalog, origin(), Some(Category::Culture));
        let ranked_names: Vec<&str> = ranked.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            ranked_names,
            vec!["culture-1", "culture-2", "culture-3", "food-0.5", "food-4"]
        );

        let stops = ItineraryBuilder::build(&ranked, 4, 4, origin());
        assert_eq!(stops.len(), 4);
        assert!(stops.iter().all(|s| s.day == 1));
        assert_eq!(names(&stops), vec!["food-0.5", "culture-1", "culture-2", "culture-3"]);

        let starts: Vec<NaiveTime> = stops.iter().map(|s| s.start_time).collect();
        assert_eq!(starts, vec![hm(9), hm(11), hm(13), hm(15)]);
        assert!(stops
            .iter()
            .all(|s| s.end_time == s.start_time + Duration::hours(2)));
    }

    #[test]
    fn test_slot_count_invariant() {
        let catalog: Vec<PlaceOfInterest> = (0..10)
            .map(|i| place_km_north(&format!("p{}", i), Category::Nature, 4.0, i as f64 + 1.0))
            .collect();

        for (total, per_day) in [(4, 4), (6, 3), (6, 4), (3, 2)] {
            let stops = ItineraryBuilder::build(&catalog, total, per_day, origin());
            assert!(stops.len() <= total.min(catalog.len()));

            let max_day = stops.iter().map(|s| s.day).max().unwrap_or(0);
            for day in 1..=max_day {
                assert!(stops.iter().filter(|s| s.day == day).count() <= per_day);
            }
        }

        let few = &catalog[..2];
        assert_eq!(ItineraryBuilder::build(few, 6, 3, origin()).len(), 2);
    }

    #[test]
    fn test_two_day_split_restarts_from_origin() {
        let catalog = vec![
            place_km_north("n1", Category::Nature, 4.0, 1.0),
            place_km_north("n2", Category::Nature, 4.0, 2.0),
            place_km_north("n3", Category::Nature, 4.0, 3.0),
            place_km_east("e1", Category::Nature, 4.0, 1.5),
            place_km_east("e2", Category::Nature, 4.0, 2.5),
            place_km_east("e3", Category::Nature, 4.0, 3.5),
        ];

        let stops = ItineraryBuilder::build(&catalog, 6, 3, origin());
        assert_eq!(stops.len(), 6);
        assert_eq!(names(&stops[..3]), vec!["n1", "n2", "n3"]);
        assert_eq!(names(&stops[3..]), vec!["e1", "e2", "e3"]);
        assert!(stops[..3].iter().all(|s| s.day == 1));
        assert!(stops[3..].iter().all(|s| s.day == 2));
        assert_eq!(stops[3].start_time, hm(9));

        let e1 = &stops[3].place;
        let expected = haversine_km(ORIGIN_LAT, ORIGIN_LON, e1.latitude, e1.longitude);
        assert!((stops[3].distance_from_previous_km - expected).abs() < 1e-9);
    }

    #[test]
    fn test_nightlife_moves_to_end_of_day() {
        let catalog = vec![
            place_km_north("club", Category::Nightlife, 4.0, 0.5),
            place_km_north("museum", Category::Culture, 4.0, 1.0),
            place_km_north("market", Category::Shopping, 4.0, 2.0),
            place_km_north("spa", Category::Relaxation, 4.0, 3.0),
        ];

        let stops = ItineraryBuilder::build(&catalog, 4, 4, origin());
        assert_eq!(names(&stops), vec!["museum", "market", "spa", "club"]);
        assert_eq!(stops[3].start_time, hm(15));
        assert!((stops[0].distance_from_previous_km - 1.0).abs() < 1e-6);
        assert!((stops[3].distance_from_previous_km - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_nightlife_on_second_day_closes_that_day() {
        let catalog = vec![
            place_km_north("n1", Category::Nature, 4.0, 1.0),
            place_km_north("n2", Category::Nature, 4.0, 2.0),
            place_km_north("n3", Category::Nature, 4.0, 3.0),
            place_km_east("club", Category::Nightlife, 4.0, 1.5),
            place_km_east("e2", Category::Food, 4.0, 2.5),
            place_km_east("e3", Category::Shopping, 4.0, 3.5),
        ];

        let stops = ItineraryBuilder::build(&catalog, 6, 3, origin());
        assert_eq!(names(&stops[..3]), vec!["n1", "n2", "n3"]);
        assert_eq!(names(&stops[3..]), vec!["e2", "e3", "club"]);
        assert!(stops[3..].iter().all(|s| s.day == 2));

        let club = &stops[5];
        assert_eq!(club.start_time, hm(13));
        assert_eq!(club.end_time, hm(15));

        let e3 = &stops[4].place;
        assert_eq!(
            club.distance_from_previous_km,
            haversine_km(e3.latitude, e3.longitude, club.place.latitude, club.place.longitude)
        );
    }

    #[test]
    fn test_nightlife_already_last_is_untouched() {
        let catalog = vec![
            place_km_north("museum", Category::Culture, 4.0, 1.0),
            place_km_north("club", Category::Nightlife, 4.0, 2.0),
        ];

        let stops = ItineraryBuilder::build(&catalog, 4, 4, origin());
        assert_eq!(names(&stops), vec!["museum", "club"]);
    }

    #[test]
    fn test_distance_chain() {
        let catalog = vec![
            place_km_north("a", Category::Food, 4.0, 1.0),
            place_km_east("b", Category::Food, 4.0, 2.0),
            place_km_north("c", Category::Food, 4.0, 3.5),
            place_km_east("d", Category::Food, 4.0, 5.0),
        ];

        let stops = ItineraryBuilder::build(&catalog, 4, 4, origin());
        let first = &stops[0].place;
        assert_eq!(
            stops[0].distance_from_previous_km,
            haversine_km(ORIGIN_LAT, ORIGIN_LON, first.latitude, first.longitude)
        );
        for pair in stops.windows(2) {
            let (prev, cur) = (&pair[0].place, &pair[1].place);
            assert_eq!(
                pair[1].distance_from_previous_km,
                haversine_km(prev.latitude, prev.longitude, cur.latitude, cur.longitude)
            );
        }
    }

    #[test]
    fn test_nearest_tie_goes_to_pool_order() {
        let catalog = vec![
            place_km_north("first", Category::Food, 4.0, 1.0),
            place_km_north("second", Category::Food, 4.0, 1.0),
        ];

        let stops = ItineraryBuilder::build(&catalog, 4, 4, origin());
        assert_eq!(names(&stops), vec!["first", "second"]);
    }

    #[test]
    fn test_custom_route_keeps_every_place_in_one_day() {
        let picked = vec![
            place_km_north("n3", Category::Culture, 3.0, 3.0),
            place_km_east("e4", Category::Food, 4.8, 4.0),
            place_km_east("e1.5", Category::Shopping, 4.1, 1.5),
            place_km_north("n1", Category::Nature, 2.0, 1.0),
            place_km_north("n2", Category::Adventure, 4.4, 2.0),
        ];

        let stops = ItineraryBuilder::build_custom(&picked, origin());
        assert_eq!(stops.len(), 5);
        assert!(stops.iter().all(|s| s.day == 1));
        assert_eq!(names(&stops), vec!["n1", "n2", "n3", "e1.5", "e4"]);

        let starts: Vec<NaiveTime> = stops.iter().map(|s| s.start_time).collect();
        assert_eq!(starts, vec![hm(9), hm(11), hm(13), hm(15), hm(17)]);
        assert_eq!(stops[4].end_time, hm(19));
    }

    #[test]
    fn test_custom_route_distance_chain() {
        let picked = vec![
            place_km_east("d", Category::Food, 4.0, 5.0),
            place_km_north("c", Category::Culture, 4.0, 3.5),
            place_km_east("b", Category::Food, 4.0, 2.0),
            place_km_north("a", Category::Nature, 4.0, 1.0),
        ];

        let stops = ItineraryBuilder::build_custom(&picked, origin());
        assert_eq!(stops.len(), 4);

        let first = &stops[0].place;
        assert_eq!(first.name, "a");
        assert_eq!(
            stops[0].distance_from_previous_km,
            haversine_km(ORIGIN_LAT, ORIGIN_LON, first.latitude, first.longitude)
        );
        for pair in stops.windows(2) {
            let (prev, cur) = (&pair[0].place, &pair[1].place);
            assert_eq!(
                pair[1].distance_from_previous_km,
                haversine_km(prev.latitude, prev.longitude, cur.latitude, cur.longitude)
            );
        }

        let full_day = (0..MAX_CUSTOM_STOPS)
            .map(|i| place_km_north(&format!("p{}", i), Category::Culture, 4.0, i as f64 + 1.0))
            .collect::<Vec<_>>();
        let stops = ItineraryBuilder::build_custom(&full_day, origin());
        assert_eq!(stops.len(), MAX_CUSTOM_STOPS);
        assert_eq!(stops[MAX_CUSTOM_STOPS - 1].end_time, hm(23));
    }

    #[test]
    fn test_custom_route_empty() {
        assert!(ItineraryBuilder::build_custom(&[], origin()).is_empty());
    }
}
