// src/db/group_repository.rs
// DOCUMENTATION: Persistent group pools
// PURPOSE: Atomic find-or-create, count, transition and join for trip groups

use crate::errors::PlannerError;
use crate::models::{GroupMember, GroupPool, GroupResponse, GroupStatus, PoolKey};
use crate::services::GroupPoolCoordinator;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct GroupRow {
    pub id: Uuid,
    pub city: String,
    pub category: String,
    pub time_budget: String,
    pub travel_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl GroupRow {
    fn into_group(self) -> Result<GroupPool, PlannerError> {
        let id = self.id;
        let corrupt = move |e: String| {
            log::error!("Corrupt trip_groups row {}: {}", id, e);
            PlannerError::DatabaseError(e)
        };

        Ok(GroupPool {
            id: self.id,
            category: self.category.parse().map_err(corrupt)?,
            time_budget: self.time_budget.parse().map_err(corrupt)?,
            status: self.status.parse().map_err(corrupt)?,
            city: self.city,
            travel_date: self.travel_date,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct MemberRow {
    pub traveler_id: Uuid,
    pub name: Option<String>,
    pub trip_id: Option<Uuid>,
    pub joined_at: DateTime<Utc>,
}

impl MemberRow {
    fn into_member(self) -> GroupMember {
        GroupMember {
            traveler_id: self.traveler_id,
            name: self.name,
            trip_id: self.trip_id,
            joined_at: self.joined_at,
        }
    }
}

fn db_error(context: &str, e: sqlx::Error) -> PlannerError {
    log::error!("{}: {}", context, e);
    PlannerError::DatabaseError(e.to_string())
}

pub struct GroupRepository;

impl GroupRepository {
    /// Assign a traveler to a pool inside the caller's transaction
    /// DOCUMENTATION: Steps, all on one connection
    /// 1. pg_advisory_xact_lock on the canonical pool key so concurrent
    ///    creators for the same key queue up
    /// 2. Oldest OPEN pool for the key, locked FOR UPDATE
    /// 3. Member count before the join
    /// 4. GroupPoolCoordinator decides create / transition
    /// 5. Pool insert or status update, then the membership insert
    ///
    /// Returns the pool and its size after the join. The locks are released
    /// when the caller commits or rolls back.
    pub async fn assign_and_join(
        conn: &mut PgConnection,
        key: &PoolKey,
        traveler_id: Uuid,
        trip_id: Option<Uuid>,
    ) -> Result<(GroupPool, i64), PlannerError> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(key.canonical())
            .execute(&mut *conn)
            .await
            .map_err(|e| db_error("Failed to lock group pool key", e))?;

        let existing = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, city, category, time_budget, travel_date, status, created_at
            FROM trip_groups
            WHERE LOWER(city) = LOWER($1)
              AND category = $2
              AND time_budget = $3
              AND travel_date = $4
              AND status = 'OPEN'
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(key.city.trim())
        .bind(key.category.as_str())
        .bind(key.time_budget.as_str())
        .bind(key.travel_date)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| db_error("Failed to look up open group pool", e))?;

        let existing = match existing {
            Some(row) => {
                let pool = row.into_group()?;
                let count = Self::count_members(&mut *conn, pool.id).await?;
                Some((pool, count))
            }
            None => None,
        };
        let before = existing.as_ref().map(|(p, _)| p.status);

        let assignment = GroupPoolCoordinator::assign(existing, key, Utc::now());
        let pool = assignment.pool;

        if assignment.created {
            sqlx::query(
                r#"
                INSERT INTO trip_groups (id, city, category, time_budget, travel_date, status, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(pool.id)
            .bind(&pool.city)
            .bind(pool.category.as_str())
            .bind(pool.time_budget.as_str())
            .bind(pool.travel_date)
            .bind(pool.status.as_str())
            .bind(pool.created_at)
            .execute(&mut *conn)
            .await
            .map_err(|e| db_error("Failed to create group pool", e))?;

            log::info!("Created group pool {} for {}", pool.id, key.canonical());
        } else if let Some(before) = before.filter(|b| *b != pool.status) {
            sqlx::query("UPDATE trip_groups SET status = $1 WHERE id = $2")
                .bind(pool.status.as_str())
                .bind(pool.id)
                .execute(&mut *conn)
                .await
                .map_err(|e| db_error("Failed to update group pool status", e))?;

            log::info!(
                "Group pool {} moved {} -> {} (pre-count {})",
                pool.id,
                before,
                pool.status,
                assignment.pre_count
            );
        }

        sqlx::query(
            r#"
            INSERT INTO trip_group_members (group_id, traveler_id, trip_id, joined_at)
            VALUES ($1, $2, $3, NOW())
            "#,
        )
        .bind(pool.id)
        .bind(traveler_id)
        .bind(trip_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| db_error("Failed to add group member", e))?;

        Ok((pool, assignment.pre_count + 1))
    }

    /// Standalone assignment in its own transaction
    pub async fn assign(
        pool: &PgPool,
        key: &PoolKey,
        traveler_id: Uuid,
    ) -> Result<(GroupPool, i64), PlannerError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let assigned = Self::assign_and_join(&mut *tx, key, traveler_id, None).await?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit group assignment", e))?;

        Ok(assigned)
    }

    pub async fn count_members(conn: &mut PgConnection, group_id: Uuid) -> Result<i64, PlannerError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM trip_group_members WHERE group_id = $1")
            .bind(group_id)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| db_error("Failed to count group members", e))?;
        Ok(count.0)
    }

    /// Pool with its current member count
    pub async fn get_with_size(pool: &PgPool, id: Uuid) -> Result<GroupResponse, PlannerError> {
        let row = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, city, category, time_budget, travel_date, status, created_at
            FROM trip_groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| db_error("Database error fetching group", e))?
        .ok_or_else(|| {
            log::warn!("Group not found: {}", id);
            PlannerError::NotFound(format!("Group {}", id))
        })?;

        let size: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM trip_group_members WHERE group_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(|e| db_error("Failed to count group members", e))?;

        Ok(GroupResponse {
            group: row.into_group()?,
            size: size.0,
        })
    }

    /// Members of a pool in join order; NotFound when the pool does not exist
    pub async fn members(pool: &PgPool, id: Uuid) -> Result<Vec<GroupMember>, PlannerError> {
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM trip_groups WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("Database error fetching group", e))?;

        if exists.is_none() {
            log::warn!("Group not found: {}", id);
            return Err(PlannerError::NotFound(format!("Group {}", id)));
        }

        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT m.traveler_id, t.name, m.trip_id, m.joined_at
            FROM trip_group_members m
            LEFT JOIN travelers t ON t.id = m.traveler_id
            WHERE m.group_id = $1
            ORDER BY m.joined_at ASC, m.traveler_id ASC
            "#,
        )
        .bind(id)
        .fetch_all(pool)
        .await
        .map_err(|e| db_error("Failed to list group members", e))?;

        Ok(rows.into_iter().map(MemberRow::into_member).collect())
    }
}
