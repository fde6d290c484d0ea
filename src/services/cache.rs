// src/services/cache.rs
// DOCUMENTATION: In-memory TTL cache for places provider items
// PURPOSE: Avoid repeat provider calls for the same area and category

use crate::models::{Category, Coordinates};
use crate::services::here_client::HerePlace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Cache entry with expiration
#[derive(Clone, Debug)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(data: T, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Raw provider items keyed by search area
/// DOCUMENTATION: Only raw items are stored. Listings are re-normalized on
/// every hit so synthesized ratings never get frozen in the cache.
pub struct ResponseCache {
    store: RwLock<HashMap<String, CacheEntry<Vec<HerePlace>>>>,
    default_ttl: Duration,
}

impl ResponseCache {
    /// Create new cache with default TTL
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            default_ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Generate cache key from search parameters
    pub fn generate_key(at: Coordinates, category: Option<Category>, limit: u32) -> String {
        format!(
            "discover:{}:{}:{}:{}",
            (at.latitude * 10000.0).round() as i64, // ~10m precision
            (at.longitude * 10000.0).round() as i64,
            limit,
            category.map(|c| c.search_term()).unwrap_or("all")
        )
    }

    /// Get cached items
    pub async fn get(&self, key: &str) -> Option<Vec<HerePlace>> {
        let store = self.store.read().await;

        match store.get(key) {
            Some(entry) if !entry.is_expired() => {
                log::debug!("Cache HIT for key: {}", key);
                Some(entry.data.clone())
            }
            Some(_) => {
                log::debug!("Cache EXPIRED for key: {}", key);
                None
            }
            None => {
                log::debug!("Cache MISS for key: {}", key);
                None
            }
        }
    }

    /// Set cached items with default TTL
    pub async fn set(&self, key: String, items: Vec<HerePlace>) {
        self.set_with_ttl(key, items, self.default_ttl).await;
    }

    /// Set cached items with custom TTL
    pub async fn set_with_ttl(&self, key: String, items: Vec<HerePlace>, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }
        let mut store = self.store.write().await;
        log::debug!("Cache SET for key: {} (TTL: {}s)", key, ttl.as_secs());
        store.insert(key, CacheEntry::new(items, ttl));
    }

    /// Clear expired entries
    pub async fn cleanup(&self) {
        let mut store = self.store.write().await;
        let before_count = store.len();
        store.retain(|_, entry| !entry.is_expired());
        let after_count = store.len();

        if before_count > after_count {
            log::info!(
                "Cache cleanup: removed {} expired entries ({} remaining)",
                before_count - after_count,
                after_count
            );
        }
    }

    /// Get cache statistics
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

/// Cache statistics
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes expired entries
pub fn start_cleanup_task(cache: Arc<ResponseCache>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds.max(1)));

        loop {
            interval.tick().await;
            cache.cleanup().await;
        }
    });
}
