// src/db/trip_repository.rs
// DOCUMENTATION: Committed trips and their stops
// PURPOSE: Persist a selected plan and read it back with its places

use crate::errors::PlannerError;
use crate::models::{
    ItineraryStop, PlaceOfInterest, PlanKey, PlanOption, TimeBudget, TravelMode, TripResponse,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

/// Everything needed to insert one trip
#[derive(Debug)]
pub struct NewTrip<'a> {
    pub id: Uuid,
    pub traveler_id: Uuid,
    pub city: &'a str,
    pub time_budget: TimeBudget,
    pub travel_mode: TravelMode,
    pub travel_date: Option<NaiveDate>,
    pub pickup_required: bool,
    pub plan: &'a PlanOption,
    pub estimated_cost: Decimal,
}

#[derive(Debug, FromRow)]
struct TripRow {
    pub id: Uuid,
    pub traveler_id: Uuid,
    pub city: String,
    pub time_budget: String,
    pub travel_mode: String,
    pub travel_date: Option<NaiveDate>,
    pub plan_label: String,
    pub estimated_cost: Decimal,
    pub group_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl TripRow {
    fn into_response(
        self,
        stops: Vec<ItineraryStop>,
        group_size: Option<i64>,
    ) -> Result<TripResponse, PlannerError> {
        let id = self.id;
        let corrupt = move |e: String| {
            log::error!("Corrupt trip row {}: {}", id, e);
            PlannerError::DatabaseError(e)
        };
        let key: PlanKey = self.plan_label.parse().map_err(corrupt)?;

        Ok(TripResponse {
            trip_id: self.id,
            traveler_id: self.traveler_id,
            city: self.city,
            time_budget: self.time_budget.parse().map_err(corrupt)?,
            travel_mode: self.travel_mode.parse().map_err(corrupt)?,
            travel_date: self.travel_date,
            plan: PlanOption::new(key, stops),
            group_id: self.group_id,
            group_size,
            estimated_cost: self.estimated_cost,
            created_at: self.created_at,
        })
    }
}

const SELECT_TRIPS: &str = r#"
    SELECT id, traveler_id, city, time_budget, travel_mode, travel_date,
           plan_label, estimated_cost, group_id, created_at
    FROM trip_requests
"#;

/// Stop joined with its place
/// DOCUMENTATION: Handles PostGIS POINT extraction via ST_X() and ST_Y()
#[derive(Debug, FromRow)]
struct StopRow {
    pub day: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub distance_from_previous_km: f64,
    pub place_id: Uuid,
    pub name: String,
    pub city: String,
    pub category: String,
    pub longitude: f64,
    pub latitude: f64,
    pub rating: Option<f64>,
}

impl StopRow {
    fn into_stop(self) -> Result<ItineraryStop, PlannerError> {
        let category = self.category.parse().map_err(|e: String| {
            log::error!("Corrupt place row {}: {}", self.place_id, e);
            PlannerError::DatabaseError(e)
        })?;

        Ok(ItineraryStop {
            day: self.day.max(0) as u32,
            place: PlaceOfInterest {
                id: self.place_id,
                name: self.name,
                city: self.city,
                latitude: self.latitude,
                longitude: self.longitude,
                category,
                rating: self.rating.unwrap_or(0.0),
            },
            start_time: self.start_time,
            end_time: self.end_time,
            distance_from_previous_km: self.distance_from_previous_km,
        })
    }
}

fn db_error(context: &str, e: sqlx::Error) -> PlannerError {
    log::error!("{}: {}", context, e);
    PlannerError::DatabaseError(e.to_string())
}

pub struct TripRepository;

impl TripRepository {
    /// Insert the trip and its stops on the caller's connection
    /// Returns the stored creation time.
    pub async fn insert(conn: &mut PgConnection, trip: &NewTrip<'_>) -> Result<DateTime<Utc>, PlannerError> {
        let created: (DateTime<Utc>,) = sqlx::query_as(
            r#"
            INSERT INTO trip_requests (
                id, traveler_id, city, time_budget, travel_mode, travel_date,
                pickup_required, plan_label, estimated_cost, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
            RETURNING created_at
            "#,
        )
        .bind(trip.id) // $1
        .bind(trip.traveler_id) // $2
        .bind(trip.city) // $3
        .bind(trip.time_budget.as_str()) // $4
        .bind(trip.travel_mode.as_str()) // $5
        .bind(trip.travel_date) // $6
        .bind(trip.pickup_required) // $7
        .bind(&trip.plan.label) // $8
        .bind(trip.estimated_cost) // $9
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| db_error("Failed to create trip", e))?;

        for (position, stop) in trip.plan.stops.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO trip_stops (
                    trip_id, position, day, place_id, start_time, end_time, distance_from_previous_km
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(trip.id)
            .bind(position as i32)
            .bind(stop.day as i32)
            .bind(stop.place.id)
            .bind(stop.start_time)
            .bind(stop.end_time)
            .bind(stop.distance_from_previous_km)
            .execute(&mut *conn)
            .await
            .map_err(|e| db_error("Failed to insert trip stop", e))?;
        }

        Ok(created.0)
    }

    pub async fn set_group(conn: &mut PgConnection, trip_id: Uuid, group_id: Uuid) -> Result<(), PlannerError> {
        sqlx::query("UPDATE trip_requests SET group_id = $1 WHERE id = $2")
            .bind(group_id)
            .bind(trip_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| db_error("Failed to link trip to group", e))?;
        Ok(())
    }

    /// Stored trip with stops ordered by (day, start_time)
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<TripResponse, PlannerError> {
        let trip = sqlx::query_as::<_, TripRow>(&format!("{} WHERE id = $1", SELECT_TRIPS))
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("Database error fetching trip", e))?
            .ok_or_else(|| {
                log::warn!("Trip not found: {}", id);
                PlannerError::NotFound(format!("Trip {}", id))
            })?;

        Self::load(pool, trip).await
    }

    /// Every trip of a traveler, newest first; empty for an unknown traveler
    pub async fn list_by_traveler(pool: &PgPool, traveler_id: Uuid) -> Result<Vec<TripResponse>, PlannerError> {
        let rows = sqlx::query_as::<_, TripRow>(&format!(
            "{} WHERE traveler_id = $1 ORDER BY created_at DESC, id ASC",
            SELECT_TRIPS
        ))
        .bind(traveler_id)
        .fetch_all(pool)
        .await
        .map_err(|e| db_error("Failed to list trips for traveler", e))?;

        let mut trips = Vec::with_capacity(rows.len());
        for row in rows {
            trips.push(Self::load(pool, row).await?);
        }

        log::debug!("Loaded {} trip(s) for traveler {}", trips.len(), traveler_id);
        Ok(trips)
    }

    /// Attach stops and group size to a trip row
    async fn load(pool: &PgPool, trip: TripRow) -> Result<TripResponse, PlannerError> {
        let stops = sqlx::query_as::<_, StopRow>(
            r#"
            SELECT
                s.day, s.start_time, s.end_time, s.distance_from_previous_km,
                p.id as place_id, p.name, p.city, p.category,
                ST_X(p.location) as longitude, ST_Y(p.location) as latitude,
                p.rating
            FROM trip_stops s
            JOIN places p ON p.id = s.place_id
            WHERE s.trip_id = $1
            ORDER BY s.day ASC, s.start_time ASC, s.position ASC
            "#,
        )
        .bind(trip.id)
        .fetch_all(pool)
        .await
        .map_err(|e| db_error("Failed to load trip stops", e))?
        .into_iter()
        .map(StopRow::into_stop)
        .collect::<Result<Vec<_>, _>>()?;

        let group_size = match trip.group_id {
            Some(group_id) => {
                let count: (i64,) =
                    sqlx::query_as("SELECT COUNT(*) FROM trip_group_members WHERE group_id = $1")
                        .bind(group_id)
                        .fetch_one(pool)
                        .await
                        .map_err(|e| db_error("Failed to count group members", e))?;
                Some(count.0)
            }
            None => None,
        };

        trip.into_response(stops, group_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn trip_row(plan_label: &str, group_id: Option<Uuid>) -> TripRow {
        TripRow {
            id: Uuid::new_v4(),
            traveler_id: Uuid::new_v4(),
            city: "Jaipur".to_string(),
            time_budget: "ONE_DAY".to_string(),
            travel_mode: "GROUP".to_string(),
            travel_date: NaiveDate::from_ymd_opt(2026, 10, 24),
            plan_label: plan_label.to_string(),
            estimated_cost: Decimal::from(2000),
            group_id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_trip_row_mapping() {
        let group_id = Uuid::new_v4();
        let row = trip_row("CULTURE Only", Some(group_id));
        let traveler_id = row.traveler_id;

        let trip = row.into_response(Vec::new(), Some(3)).unwrap();
        assert_eq!(trip.traveler_id, traveler_id);
        assert_eq!(trip.time_budget, TimeBudget::OneDay);
        assert_eq!(trip.travel_mode, TravelMode::Group);
        assert_eq!(
            trip.plan.key,
            PlanKey::PerCategory {
                category: Category::Culture
            }
        );
        assert_eq!(trip.plan.label, "CULTURE Only");
        assert_eq!(trip.group_id, Some(group_id));
        assert_eq!(trip.group_size, Some(3));

        let custom = trip_row("Custom", None).into_response(Vec::new(), None).unwrap();
        assert_eq!(custom.plan.key, PlanKey::Custom);
    }

    #[test]
    fn test_corrupt_trip_row_is_database_error() {
        assert!(matches!(
            trip_row("Weekend Special", None).into_response(Vec::new(), None),
            Err(PlannerError::DatabaseError(_))
        ));
    }

    #[test]
    fn test_stop_row_mapping() {
        let row = StopRow {
            day: 2,
            start_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            distance_from_previous_km: 1.25,
            place_id: Uuid::new_v4(),
            name: "Hawa Mahal".to_string(),
            city: "Jaipur".to_string(),
            category: "CULTURE".to_string(),
            longitude: 75.82,
            latitude: 26.92,
            rating: Some(4.6),
        };

        let stop = row.into_stop().unwrap();
        assert_eq!(stop.day, 2);
        assert_eq!(stop.place.category, Category::Culture);
        assert_eq!(stop.place.rating, 4.6);
        assert_eq!(stop.distance_from_previous_km, 1.25);
    }
}
