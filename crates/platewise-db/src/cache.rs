//! Restaurant detail cache.
//!
//! Assembled [`RestaurantDetail`] records are written once per place id and
//! served from here until they are older than the configured TTL. Writes are
//! last-writer-wins; there is no versioning.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use platewise_core::{PlaceId, RestaurantDetail};
use sqlx::{types::Json, PgPool};
use tokio::sync::RwLock;

use crate::DbError;

/// Key-value store for assembled restaurant details.
#[async_trait]
pub trait RestaurantCache: Send + Sync {
    /// Fetch a fresh entry. Expired entries are reported as absent.
    async fn get(&self, place_id: &PlaceId) -> Result<Option<RestaurantDetail>, DbError>;

    /// Insert or replace the entry for `place_id`.
    async fn put(&self, place_id: &PlaceId, detail: &RestaurantDetail) -> Result<(), DbError>;

    /// Delete expired entries, returning how many were removed.
    async fn purge_expired(&self) -> Result<u64, DbError>;

    /// Verify the backing store is reachable.
    async fn ping(&self) -> Result<(), DbError>;

    /// Short backend name for health reporting.
    fn backend(&self) -> &'static str;
}

/// Convert the configured TTL into an optional expiry window. `0` disables expiry.
#[must_use]
pub fn ttl_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Postgres-backed cache over the `restaurant_cache` table.
#[derive(Debug, Clone)]
pub struct PgRestaurantCache {
    pool: PgPool,
    ttl: Option<Duration>,
}

impl PgRestaurantCache {
    #[must_use]
    pub fn new(pool: PgPool, ttl: Option<Duration>) -> Self {
        Self { pool, ttl }
    }

    fn ttl_secs(&self) -> Option<f64> {
        self.ttl.map(|ttl| ttl.as_secs_f64())
    }
}

#[async_trait]
impl RestaurantCache for PgRestaurantCache {
    async fn get(&self, place_id: &PlaceId) -> Result<Option<RestaurantDetail>, DbError> {
        let row = sqlx::query_scalar::<_, Json<RestaurantDetail>>(
            "SELECT detail FROM restaurant_cache \
             WHERE place_id = $1 \
               AND ($2::float8 IS NULL OR fetched_at > NOW() - make_interval(secs => $2::float8))",
        )
        .bind(place_id.as_str())
        .bind(self.ttl_secs())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|Json(detail)| detail))
    }

    async fn put(&self, place_id: &PlaceId, detail: &RestaurantDetail) -> Result<(), DbError> {
        sqlx::query(
            "INSERT INTO restaurant_cache (place_id, detail, fetched_at) \
             VALUES ($1, $2, NOW()) \
             ON CONFLICT (place_id) DO UPDATE \
             SET detail = EXCLUDED.detail, fetched_at = EXCLUDED.fetched_at",
        )
        .bind(place_id.as_str())
        .bind(Json(detail))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, DbError> {
        let Some(ttl_secs) = self.ttl_secs() else {
            return Ok(0);
        };

        let result = sqlx::query(
            "DELETE FROM restaurant_cache \
             WHERE fetched_at <= NOW() - make_interval(secs => $1::float8)",
        )
        .bind(ttl_secs)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), DbError> {
        crate::health_check(&self.pool).await
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// Process-local cache used when no database is configured, and in tests.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<PlaceId, (Instant, RestaurantDetail)>>,
    ttl: Option<Duration>,
}

impl MemoryCache {
    #[must_use]
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn is_fresh(&self, stored_at: Instant) -> bool {
        self.ttl.is_none_or(|ttl| stored_at.elapsed() < ttl)
    }
}

#[async_trait]
impl RestaurantCache for MemoryCache {
    async fn get(&self, place_id: &PlaceId) -> Result<Option<RestaurantDetail>, DbError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(place_id)
            .filter(|(stored_at, _)| self.is_fresh(*stored_at))
            .map(|(_, detail)| detail.clone()))
    }

    async fn put(&self, place_id: &PlaceId, detail: &RestaurantDetail) -> Result<(), DbError> {
        self.entries
            .write()
            .await
            .insert(place_id.clone(), (Instant::now(), detail.clone()));
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, DbError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, (stored_at, _)| self.is_fresh(*stored_at));
        Ok((before - entries.len()) as u64)
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(name: &str) -> RestaurantDetail {
        RestaurantDetail {
            place_id: PlaceId::parse("ChIJ_cache_test").expect("valid id"),
            name: name.to_string(),
            address: "1 Test Way".to_string(),
            rating: Some(4.1),
            reviews_count: 12,
            reviews: Vec::new(),
            photos: Vec::new(),
            summary: "ok".to_string(),
        }
    }

    fn id() -> PlaceId {
        PlaceId::parse("ChIJ_cache_test").expect("valid id")
    }

    #[test]
    fn zero_ttl_disables_expiry() {
        assert_eq!(ttl_from_secs(0), None);
        assert_eq!(ttl_from_secs(60), Some(Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn memory_cache_misses_unknown_ids() {
        let cache = MemoryCache::new(None);
        assert!(cache.get(&id()).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn memory_cache_round_trips_entries() {
        let cache = MemoryCache::new(None);
        cache.put(&id(), &detail("Roma")).await.expect("put");
        let hit = cache.get(&id()).await.expect("get");
        assert_eq!(hit, Some(detail("Roma")));
    }

    #[tokio::test]
    async fn memory_cache_last_writer_wins() {
        let cache = MemoryCache::new(None);
        cache.put(&id(), &detail("first")).await.expect("put");
        cache.put(&id(), &detail("second")).await.expect("put");
        let hit = cache.get(&id()).await.expect("get").expect("entry");
        assert_eq!(hit.name, "second");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn memory_cache_hides_and_purges_expired_entries() {
        let cache = MemoryCache::new(Some(Duration::from_millis(5)));
        cache.put(&id(), &detail("Roma")).await.expect("put");
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(cache.get(&id()).await.expect("get").is_none());
        assert_eq!(cache.purge_expired().await.expect("purge"), 1);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn memory_cache_without_ttl_never_expires() {
        let cache = MemoryCache::new(None);
        cache.put(&id(), &detail("Roma")).await.expect("put");
        assert_eq!(cache.purge_expired().await.expect("purge"), 0);
        assert!(cache.get(&id()).await.expect("get").is_some());
    }
}
