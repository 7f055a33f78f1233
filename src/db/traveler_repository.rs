// src/db/traveler_repository.rs
// DOCUMENTATION: Traveler profile lookup
// PURPOSE: Read the profile fields planning needs (home city, coordinates,
// preferred interest, travel mode)

use crate::errors::PlannerError;
use crate::models::{Traveler, TravelMode};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct TravelerRow {
    pub id: Uuid,
    pub name: String,
    pub home_city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub preferred_category: Option<String>,
    pub travel_mode: Option<String>,
}

impl TravelerRow {
    /// Unparseable enum columns degrade to "not set"
    fn into_traveler(self) -> Traveler {
        Traveler {
            id: self.id,
            name: self.name,
            home_city: self.home_city,
            latitude: self.latitude,
            longitude: self.longitude,
            preferred_category: self.preferred_category.and_then(|c| c.parse().ok()),
            travel_mode: self
                .travel_mode
                .and_then(|m| m.parse::<TravelMode>().ok())
                .unwrap_or_default(),
        }
    }
}

pub struct TravelerRepository;

impl TravelerRepository {
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Traveler, PlannerError> {
        let row = sqlx::query_as::<_, TravelerRow>(
            r#"
            SELECT id, name, home_city, latitude, longitude, preferred_category, travel_mode
            FROM travelers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Database error fetching traveler {}: {}", id, e);
            PlannerError::DatabaseError(e.to_string())
        })?
        .ok_or_else(|| {
            log::warn!("Traveler not found: {}", id);
            PlannerError::NotFound(format!("Traveler {}", id))
        })?;

        Ok(row.into_traveler())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn test_row_mapping_defaults() {
        let traveler = TravelerRow {
            id: Uuid::new_v4(),
            name: "Ravi".to_string(),
            home_city: Some("Jaipur".to_string()),
            latitude: None,
            longitude: None,
            preferred_category: Some("nightlife".to_string()),
            travel_mode: Some("carpool".to_string()),
        }
        .into_traveler();

        assert_eq!(traveler.preferred_category, Some(Category::Nightlife));
        assert_eq!(traveler.travel_mode, TravelMode::Solo);
    }
}
