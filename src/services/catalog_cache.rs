// src/services/catalog_cache.rs
// DOCUMENTATION: In-memory catalog snapshots per city
// PURPOSE: Serve preview and commit from the same immutable catalog so a plan
// key resolves to the same stops it showed during preview

use crate::models::PlaceOfInterest;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Immutable catalog for one city
pub type CatalogSnapshot = Arc<[PlaceOfInterest]>;

#[derive(Clone, Debug)]
struct CacheEntry {
    snapshot: CatalogSnapshot,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(snapshot: CatalogSnapshot, ttl: Duration) -> Self {
        Self {
            snapshot,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// TTL cache of catalog snapshots keyed by normalized city name
/// DOCUMENTATION: Snapshots are shared, never mutated. A refresh replaces the
/// entry; callers holding the old Arc keep a consistent view.
pub struct CatalogCache {
    store: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl CatalogCache {
    pub fn new(ttl_seconds: u64) -> Self {
        Self::with_ttl(Duration::from_secs(ttl_seconds))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn key(city: &str) -> String {
        city.trim().to_lowercase()
    }

    pub async fn get(&self, city: &str) -> Option<CatalogSnapshot> {
        let key = Self::key(city);
        let store = self.store.read().await;

        match store.get(&key) {
            Some(entry) if !entry.is_expired() => {
                log::debug!("Catalog cache HIT for city: {}", key);
                Some(entry.snapshot.clone())
            }
            Some(_) => {
                log::debug!("Catalog cache EXPIRED for city: {}", key);
                None
            }
            None => {
                log::debug!("Catalog cache MISS for city: {}", key);
                None
            }
        }
    }

    /// Store a freshly loaded catalog and return the shared snapshot
    /// DOCUMENTATION: An empty catalog is handed back but never stored, so a
    /// city whose places are added later is picked up on the next request.
    pub async fn insert(&self, city: &str, places: Vec<PlaceOfInterest>) -> CatalogSnapshot {
        let key = Self::key(city);
        let snapshot: CatalogSnapshot = places.into();

        if snapshot.is_empty() {
            log::debug!("Catalog cache SKIP for city: {} (no places)", key);
            return snapshot;
        }

        let mut store = self.store.write().await;
        store.insert(key.clone(), CacheEntry::new(snapshot.clone(), self.ttl));
        log::debug!(
            "Catalog cache SET for city: {} ({} places, TTL: {}s)",
            key,
            snapshot.len(),
            self.ttl.as_secs()
        );

        snapshot
    }

    /// Clear expired entries
    pub async fn cleanup(&self) {
        let mut store = self.store.write().await;
        let before_count = store.len();
        store.retain(|_, entry| !entry.is_expired());
        let after_count = store.len();

        if before_count > after_count {
            log::info!(
                "Catalog cache cleanup: removed {} expired snapshots ({} remaining)",
                before_count - after_count,
                after_count
            );
        }
    }

    pub async fn stats(&self) -> CacheStats {
        let store = self.store.read().await;
        let total = store.len();
        let expired = store.values().filter(|e| e.is_expired()).count();

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes expired snapshots
pub fn start_cleanup_task(cache: Arc<CatalogCache>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds.max(1)));

        loop {
            interval.tick().await;
            cache.cleanup().await;
        }
    });
}
