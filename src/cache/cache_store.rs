//! Fast-path blob cache with per-entry TTL, backed by moka.
//!
//! Readers only ever see the last published value (or nothing); refresh
//! computations write through `put` and never block a concurrent `get`.

use moka::future::Cache;
use moka::Expiry;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CachedBlob {
    value: Value,
    ttl: Duration,
}

struct PerEntryExpiry;

impl Expiry<String, CachedBlob> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        blob: &CachedBlob,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(blob.ttl)
    }
}

/// Key -> opaque JSON blob store. Absence means "never computed" and is
/// a valid, non-error state for every consumer.
pub struct CacheStore {
    entries: Cache<String, CachedBlob>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(100_000)
                .expire_after(PerEntryExpiry)
                .build(),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).await.map(|blob| blob.value)
    }

    pub async fn put(&self, key: impl Into<String>, value: Value, ttl: Duration) {
        self.entries.insert(key.into(), CachedBlob { value, ttl }).await;
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub async fn invalidate(&self, key: &str) {
        self.entries.invalidate(key).await;
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

pub type SharedCacheStore = Arc<CacheStore>;

// Cache keys are deterministic functions of the identifiers that scope
// the entry, mirroring the keys the API layer reads.

pub fn user_xp_stats_key(steam_id: &str) -> String {
    format!("user_xp_stats_{}", steam_id)
}

pub fn global_completion_key(steam_id: &str) -> String {
    format!("global_completion_{}", steam_id)
}

pub fn latest_achievements_key(steam_id: &str) -> String {
    format!("latest_achievements_details_{}", steam_id)
}

pub fn nearly_completed_key(steam_id: &str) -> String {
    format!("nearly_completed_games_{}", steam_id)
}

pub fn game_schema_key(app_id: i64) -> String {
    format!("game_schema_{}", app_id)
}

pub fn rarity_updated_key(app_id: i64) -> String {
    format!("rarity_updated_{}", app_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_get() {
        let cache = CacheStore::new();

        cache
            .put("user_xp_stats_1", json!({"total_xp": 575}), Duration::from_secs(60))
            .await;

        let value = cache.get("user_xp_stats_1").await;
        assert_eq!(value, Some(json!({"total_xp": 575})));
    }

    #[tokio::test]
    async fn test_miss_is_none() {
        let cache = CacheStore::new();
        assert!(cache.get("never_computed").await.is_none());
    }

    #[tokio::test]
    async fn test_expiry() {
        let cache = CacheStore::new();

        cache
            .put("short_lived", json!(1), Duration::from_millis(20))
            .await;
        assert!(cache.get("short_lived").await.is_some());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(cache.get("short_lived").await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = CacheStore::new();

        cache.put("marker", json!(true), Duration::from_secs(60)).await;
        cache.invalidate("marker").await;
        assert!(cache.get("marker").await.is_none());
    }

    #[test]
    fn test_key_builders() {
        assert_eq!(user_xp_stats_key("765611980"), "user_xp_stats_765611980");
        assert_eq!(game_schema_key(440), "game_schema_440");
        assert_eq!(rarity_updated_key(440), "rarity_updated_440");
    }
}
