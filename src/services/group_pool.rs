// src/services/group_pool.rs
// DOCUMENTATION: Group pool lifecycle
// PURPOSE: Decide which pool a group traveler lands in and advance the pool's
// state as membership grows (OPEN -> READY -> CLOSED)

use crate::models::{Category, GroupPool, GroupStatus, PoolKey, TimeBudget};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Members (before the join) at which a pool becomes READY, counting the joiner
pub const READY_THRESHOLD: i64 = 4;

/// Members (before the join) at which a pool is CLOSED
pub const CLOSE_THRESHOLD: i64 = 6;

/// Result of one assignment decision
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub pool: GroupPool,
    /// Whether the pool was created by this assignment
    pub created: bool,
    /// Members before the traveler joined
    pub pre_count: i64,
}

impl Assignment {
    pub fn status_changed(&self, before: GroupStatus) -> bool {
        self.pool.status != before
    }
}

/// Pure lifecycle rules shared by the in-memory registry and the database path
pub struct GroupPoolCoordinator;

impl GroupPoolCoordinator {
    /// Pool key for a request; no travel date means no pool
    pub fn pool_key(
        city: &str,
        category: Category,
        time_budget: TimeBudget,
        travel_date: Option<NaiveDate>,
    ) -> Option<PoolKey> {
        let travel_date = travel_date?;
        Some(PoolKey {
            city: city.trim().to_string(),
            category,
            time_budget,
            travel_date,
        })
    }

    /// Next state given the membership count before the join
    /// DOCUMENTATION: pre_count >= 6 closes the pool (the triggering traveler
    /// still joins it, so a closed pool can hold 7); otherwise reaching 4 with
    /// the joiner makes it READY. States never move backwards.
    pub fn transition(current: GroupStatus, pre_count: i64) -> GroupStatus {
        let computed = if pre_count >= CLOSE_THRESHOLD {
            GroupStatus::Closed
        } else if pre_count + 1 >= READY_THRESHOLD {
            GroupStatus::Ready
        } else {
            GroupStatus::Open
        };
        current.max(computed)
    }

    pub fn open_pool(key: &PoolKey, now: DateTime<Utc>) -> GroupPool {
        GroupPool {
            id: Uuid::new_v4(),
            city: key.city.clone(),
            category: key.category,
            time_budget: key.time_budget,
            travel_date: Some(key.travel_date),
            status: GroupStatus::Open,
            created_at: now,
        }
    }

    /// Decide the pool for a traveler
    /// `existing` is the oldest OPEN pool matching the key with its member count.
    pub fn assign(
        existing: Option<(GroupPool, i64)>,
        key: &PoolKey,
        now: DateTime<Utc>,
    ) -> Assignment {
        let (mut pool, pre_count, created) = match existing {
            Some((pool, count)) => (pool, count, false),
            None => (Self::open_pool(key, now), 0, true),
        };

        pool.status = Self::transition(pool.status, pre_count);

        Assignment {
            pool,
            created,
            pre_count,
        }
    }
}

#[derive(Default)]
struct RegistryState {
    /// Creation order
    pools: Vec<GroupPool>,
    members: HashMap<Uuid, Vec<Uuid>>,
}

/// In-process pool table for library callers
/// DOCUMENTATION: The whole find-or-create, count, transition and join
/// sequence runs under one lock, so concurrent joins see accurate counts.
/// The service shell uses GroupRepository::assign_and_join instead.
#[derive(Default)]
pub struct GroupPoolRegistry {
    state: Mutex<RegistryState>,
}

impl GroupPoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a traveler to a pool and record the membership
    /// Returns None (traveler proceeds solo) when no travel date is given.
    pub fn assign(
        &self,
        city: &str,
        category: Category,
        time_budget: TimeBudget,
        travel_date: Option<NaiveDate>,
        traveler_id: Uuid,
    ) -> Option<GroupPool> {
        let Some(key) = GroupPoolCoordinator::pool_key(city, category, time_budget, travel_date)
        else {
            log::debug!("No travel date for traveler {} - skipping group assignment", traveler_id);
            return None;
        };

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        let existing = state
            .pools
            .iter()
            .find(|p| p.status == GroupStatus::Open && p.matches(&key))
            .cloned()
            .map(|p| {
                let count = state.members.get(&p.id).map_or(0, |m| m.len() as i64);
                (p, count)
            });
        let before = existing.as_ref().map(|(p, _)| p.status);

        let assignment = GroupPoolCoordinator::assign(existing, &key, Utc::now());
        let pool = assignment.pool.clone();

        if assignment.created {
            log::info!("Created group pool {} for {}", pool.id, key.canonical());
            state.pools.push(pool.clone());
        } else if let Some(slot) = state.pools.iter_mut().find(|p| p.id == pool.id) {
            *slot = pool.clone();
        }

        if let Some(before) = before {
            if assignment.status_changed(before) {
                log::info!(
                    "Group pool {} moved {} -> {} (pre-count {})",
                    pool.id,
                    before,
                    pool.status,
                    assignment.pre_count
                );
            }
        }

        state.members.entry(pool.id).or_default().push(traveler_id);
        Some(pool)
    }

    pub fn get(&self, pool_id: Uuid) -> Option<GroupPool> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.pools.iter().find(|p| p.id == pool_id).cloned()
    }

    pub fn member_count(&self, pool_id: Uuid) -> i64 {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.members.get(&pool_id).map_or(0, |m| m.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2026, 10, 24)
    }

    fn key() -> PoolKey {
        GroupPoolCoordinator::pool_key("Jaipur", Category::Culture, TimeBudget::TwoDay, date())
            .unwrap()
    }

    #[test]
    fn test_transition_thresholds() {
        use GroupStatus::*;

        assert_eq!(GroupPoolCoordinator::transition(Open, 0), Open);
        assert_eq!(GroupPoolCoordinator::transition(Open, 2), Open);
        assert_eq!(GroupPoolCoordinator::transition(Open, 3), Ready);
        assert_eq!(GroupPoolCoordinator::transition(Open, 5), Ready);
        assert_eq!(GroupPoolCoordinator::transition(Open, 6), Closed);
        assert_eq!(GroupPoolCoordinator::transition(Open, 9), Closed);
    }

    #[test]
    fn test_transition_never_moves_backwards() {
        assert_eq!(
            GroupPoolCoordinator::transition(GroupStatus::Ready, 0),
            GroupStatus::Ready
        );
        assert_eq!(
            GroupPoolCoordinator::transition(GroupStatus::Closed, 3),
            GroupStatus::Closed
        );
    }

    #[test]
    fn test_assign_creates_open_pool() {
        let assignment = GroupPoolCoordinator::assign(None, &key(), Utc::now());
        assert!(assignment.created);
        assert_eq!(assignment.pre_count, 0);
        assert_eq!(assignment.pool.status, GroupStatus::Open);
        assert_eq!(assignment.pool.travel_date, date());
    }

    #[test]
    fn test_close_still_admits_triggering_traveler() {
        // Observed semantics: the count is taken before the join, so a pool
        // with six members closes on the seventh join and holds seven.
        let pool = GroupPoolCoordinator::open_pool(&key(), Utc::now());
        let assignment = GroupPoolCoordinator::assign(Some((pool.clone(), 6)), &key(), Utc::now());

        assert!(!assignment.created);
        assert_eq!(assignment.pool.id, pool.id);
        assert_eq!(assignment.pool.status, GroupStatus::Closed);
        assert_eq!(assignment.pre_count + 1, 7);
    }

    #[test]
    fn test_missing_travel_date_skips_assignment() {
        let registry = GroupPoolRegistry::new();
        let pool = registry.assign(
            "Jaipur",
            Category::Culture,
            TimeBudget::OneDay,
            None,
            Uuid::new_v4(),
        );
        assert!(pool.is_none());
    }

    #[test]
    fn test_two_sequential_assignments_share_open_pool() {
        let registry = GroupPoolRegistry::new();
        let first = registry
            .assign("Jaipur", Category::Culture, TimeBudget::TwoDay, date(), Uuid::new_v4())
            .unwrap();
        assert_eq!(first.status, GroupStatus::Open);
        assert_eq!(registry.member_count(first.id), 1);

        let second = registry
            .assign("jaipur", Category::Culture, TimeBudget::TwoDay, date(), Uuid::new_v4())
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.status, GroupStatus::Open);
        assert_eq!(registry.member_count(first.id), 2);
    }

    #[test]
    fn test_fourth_traveler_makes_pool_ready() {
        let registry = GroupPoolRegistry::new();
        let ids: Vec<Uuid> = (0..4)
            .map(|_| {
                registry
                    .assign("Jaipur", Category::Culture, TimeBudget::TwoDay, date(), Uuid::new_v4())
                    .unwrap()
                    .id
            })
            .collect();

        assert!(ids.iter().all(|id| *id == ids[0]));
        assert_eq!(registry.get(ids[0]).unwrap().status, GroupStatus::Ready);

        // A READY pool is no longer matched; the next traveler opens a new one
        let fifth = registry
            .assign("Jaipur", Category::Culture, TimeBudget::TwoDay, date(), Uuid::new_v4())
            .unwrap();
        assert_ne!(fifth.id, ids[0]);
        assert_eq!(fifth.status, GroupStatus::Open);
    }

    #[test]
    fn test_different_keys_use_different_pools() {
        let registry = GroupPoolRegistry::new();
        let culture = registry
            .assign("Jaipur", Category::Culture, TimeBudget::TwoDay, date(), Uuid::new_v4())
            .unwrap();
        let food = registry
            .assign("Jaipur", Category::Food, TimeBudget::TwoDay, date(), Uuid::new_v4())
            .unwrap();
        assert_ne!(culture.id, food.id);
    }

    #[test]
    fn test_concurrent_joins_keep_accurate_counts() {
        let registry = GroupPoolRegistry::new();

        let pools: Vec<Uuid> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        registry
                            .assign("Jaipur", Category::Culture, TimeBudget::OneDay, date(), Uuid::new_v4())
                            .unwrap()
                            .id
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let mut distinct = pools.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct.len(), 2);
        for id in distinct {
            assert_eq!(registry.member_count(id), 4);
            assert_eq!(registry.get(id).unwrap().status, GroupStatus::Ready);
        }
    }
}
