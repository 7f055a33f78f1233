// src/models/group.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{Category, TimeBudget};

/// Lifecycle state of a shared-trip pool
/// Ordering follows the lifecycle: Open < Ready < Closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupStatus {
    Open,
    Ready,
    Closed,
}

impl GroupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupStatus::Open => "OPEN",
            GroupStatus::Ready => "READY",
            GroupStatus::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OPEN" => Ok(GroupStatus::Open),
            "READY" => Ok(GroupStatus::Ready),
            "CLOSED" => Ok(GroupStatus::Closed),
            _ => Err(format!("Unknown group status: {}", s)),
        }
    }
}

/// A shared-trip cohort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPool {
    pub id: Uuid,
    pub city: String,
    pub category: Category,
    pub time_budget: TimeBudget,
    pub travel_date: Option<NaiveDate>,
    pub status: GroupStatus,
    pub created_at: DateTime<Utc>,
}

impl GroupPool {
    /// Whether this pool is the one a traveler with `key` should land in
    pub fn matches(&self, key: &PoolKey) -> bool {
        self.city.eq_ignore_ascii_case(&key.city)
            && self.category == key.category
            && self.time_budget == key.time_budget
            && self.travel_date == Some(key.travel_date)
    }
}

/// Matching key of a pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolKey {
    pub city: String,
    pub category: Category,
    pub time_budget: TimeBudget,
    pub travel_date: NaiveDate,
}

impl PoolKey {
    /// Canonical text form, city lower-cased; used as a lock key
    pub fn canonical(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.city.trim().to_lowercase(),
            self.category,
            self.time_budget,
            self.travel_date
        )
    }
}

/// Request DTO for POST /groups/assign
#[derive(Debug, Deserialize)]
pub struct GroupAssignRequest {
    pub city: String,
    pub category: Category,
    #[serde(default)]
    pub time_budget: TimeBudget,
    pub travel_date: Option<NaiveDate>,
    pub traveler_id: Uuid,
}

/// Pool summary with its current size
#[derive(Debug, Serialize)]
pub struct GroupResponse {
    #[serde(flatten)]
    pub group: GroupPool,
    pub size: i64,
}

/// One traveler in a pool, as returned by GET /groups/{id}/members
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMember {
    pub traveler_id: Uuid,
    pub name: Option<String>,
    /// Trip that brought the traveler in; absent for standalone assignment
    pub trip_id: Option<Uuid>,
    pub joined_at: DateTime<Utc>,
}
