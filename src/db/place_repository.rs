// src/db/place_repository.rs
// DOCUMENTATION: Read access to the places catalog
// PURPOSE: Load the planning catalog for a city from PostgreSQL/PostGIS

use crate::errors::PlannerError;
use crate::models::{Category, PlaceOfInterest};
use sqlx::{FromRow, PgPool};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Internal struct for mapping database rows to PlaceOfInterest
/// DOCUMENTATION: Handles PostGIS POINT extraction via ST_X() and ST_Y()
#[derive(Debug, FromRow)]
struct PlaceRow {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub category: String,
    pub longitude: f64, // From ST_X(location)
    pub latitude: f64,  // From ST_Y(location)
    pub rating: Option<f64>,
}

impl PlaceRow {
    /// Rows with an unknown category are skipped with a warning
    fn into_place(self) -> Option<PlaceOfInterest> {
        let category = match self.category.parse::<Category>() {
            Ok(category) => category,
            Err(e) => {
                log::warn!("Skipping place {}: {}", self.id, e);
                return None;
            }
        };

        Some(PlaceOfInterest {
            id: self.id,
            name: self.name,
            city: self.city,
            latitude: self.latitude,
            longitude: self.longitude,
            category,
            rating: self.rating.unwrap_or(0.0),
        })
    }
}

const SELECT_PLACES: &str = r#"
    SELECT
        p.id, p.name, p.city, p.category,
        ST_X(p.location) as longitude, ST_Y(p.location) as latitude,
        p.rating
    FROM places p
"#;

/// PlaceRepository: catalog queries
/// DOCUMENTATION: Rows come back in a stable order (created_at, id) so the
/// catalog order, and therefore every tie-break downstream, is reproducible
pub struct PlaceRepository;

impl PlaceRepository {
    /// All active places of a city, matched case-insensitively
    pub async fn find_by_city(pool: &PgPool, city: &str) -> Result<Vec<PlaceOfInterest>, PlannerError> {
        let sql = format!(
            "{} WHERE LOWER(p.city) = LOWER($1) AND p.is_active = true ORDER BY p.created_at ASC, p.id ASC",
            SELECT_PLACES
        );

        let rows = sqlx::query_as::<_, PlaceRow>(&sql)
            .bind(city.trim())
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to load catalog for {}: {}", city, e);
                PlannerError::DatabaseError(e.to_string())
            })?;

        let places: Vec<PlaceOfInterest> = rows.into_iter().filter_map(PlaceRow::into_place).collect();
        log::debug!("Loaded {} places for city {}", places.len(), city);
        Ok(places)
    }

    /// Every active place, used by nearby search without a city
    pub async fn find_all(pool: &PgPool) -> Result<Vec<PlaceOfInterest>, PlannerError> {
        let sql = format!(
            "{} WHERE p.is_active = true ORDER BY p.created_at ASC, p.id ASC",
            SELECT_PLACES
        );

        let rows = sqlx::query_as::<_, PlaceRow>(&sql)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to load catalog: {}", e);
                PlannerError::DatabaseError(e.to_string())
            })?;

        Ok(rows.into_iter().filter_map(PlaceRow::into_place).collect())
    }

    /// Active places for the given ids, in request order with repeats dropped
    /// DOCUMENTATION: Any id without a usable active place is InvalidInput
    pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<PlaceOfInterest>, PlannerError> {
        let sql = format!("{} WHERE p.id = ANY($1) AND p.is_active = true", SELECT_PLACES);

        let rows = sqlx::query_as::<_, PlaceRow>(&sql)
            .bind(ids)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to load places by id: {}", e);
                PlannerError::DatabaseError(e.to_string())
            })?;

        let found: Vec<PlaceOfInterest> = rows.into_iter().filter_map(PlaceRow::into_place).collect();
        Self::in_request_order(ids, found)
    }

    fn in_request_order(
        ids: &[Uuid],
        found: Vec<PlaceOfInterest>,
    ) -> Result<Vec<PlaceOfInterest>, PlannerError> {
        let mut by_id: HashMap<Uuid, PlaceOfInterest> = found.into_iter().map(|p| (p.id, p)).collect();
        let mut seen = HashSet::new();
        let mut ordered = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();

        for id in ids.iter().filter(|id| seen.insert(**id)) {
            match by_id.remove(id) {
                Some(place) => ordered.push(place),
                None => missing.push(id.to_string()),
            }
        }

        if !missing.is_empty() {
            log::warn!("Unknown place ids requested: {}", missing.join(", "));
            return Err(PlannerError::InvalidInput(format!(
                "Some place IDs are invalid: {}",
                missing.join(", ")
            )));
        }

        Ok(ordered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(category: &str) -> PlaceRow {
        PlaceRow {
            id: Uuid::new_v4(),
            name: "Amber Fort".to_string(),
            city: "Jaipur".to_string(),
            category: category.to_string(),
            longitude: 75.85,
            latitude: 26.98,
            rating: None,
        }
    }

    #[test]
    fn test_row_mapping() {
        let place = row("culture").into_place().unwrap();
        assert_eq!(place.category, Category::Culture);
        assert_eq!(place.latitude, 26.98);
        assert_eq!(place.longitude, 75.85);
        assert_eq!(place.rating, 0.0);
    }

    #[test]
    fn test_unknown_category_is_skipped() {
        assert!(row("CASINO").into_place().is_none());
    }

    #[test]
    fn test_places_follow_request_order() {
        let a = row("CULTURE").into_place().unwrap();
        let b = row("FOOD").into_place().unwrap();
        let ids = vec![b.id, a.id, b.id];

        let ordered = PlaceRepository::in_request_order(&ids, vec![a.clone(), b.clone()]).unwrap();
        assert_eq!(ordered, vec![b, a]);
    }

    #[test]
    fn test_unknown_place_id_is_invalid_input() {
        let a = row("CULTURE").into_place().unwrap();
        let unknown = Uuid::new_v4();

        let err = PlaceRepository::in_request_order(&[a.id, unknown], vec![a]).unwrap_err();
        assert!(matches!(err, PlannerError::InvalidInput(msg) if msg.contains(&unknown.to_string())));
    }
}
