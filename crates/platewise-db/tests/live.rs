//! Live tests for `PgRestaurantCache` using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database from the sqlx
//! test harness, so they need `DATABASE_URL` and are ignored by default.
//! Run with `cargo test -p platewise-db -- --ignored`.

use std::time::Duration;

use platewise_core::{Photo, Platform, PlaceId, RestaurantDetail, Review};
use platewise_db::{PgRestaurantCache, RestaurantCache};

fn place_id() -> PlaceId {
    PlaceId::parse("ChIJ_live_cache").expect("valid id")
}

fn detail(summary: &str) -> RestaurantDetail {
    RestaurantDetail {
        place_id: place_id(),
        name: "Live Bistro".to_string(),
        address: "9 Harbor Rd".to_string(),
        rating: Some(3.67),
        reviews_count: 150,
        reviews: vec![Review {
            platform: Platform::Yelp,
            author: "sam".to_string(),
            text: "Solid brunch".to_string(),
            rating: 4.0,
        }],
        photos: vec![Photo {
            url: "https://example.com/live.jpg".to_string(),
        }],
        summary: summary.to_string(),
    }
}

#[ignore = "requires DATABASE_URL"]
#[sqlx::test(migrations = "../../migrations")]
async fn put_then_get_returns_stored_detail(pool: sqlx::PgPool) {
    let cache = PgRestaurantCache::new(pool, Some(Duration::from_secs(3600)));
    cache.put(&place_id(), &detail("first")).await.expect("put");

    let hit = cache.get(&place_id()).await.expect("get");
    assert_eq!(hit, Some(detail("first")));
}

#[ignore = "requires DATABASE_URL"]
#[sqlx::test(migrations = "../../migrations")]
async fn put_overwrites_existing_entry(pool: sqlx::PgPool) {
    let cache = PgRestaurantCache::new(pool, None);
    cache.put(&place_id(), &detail("first")).await.expect("put");
    cache.put(&place_id(), &detail("second")).await.expect("put");

    let hit = cache.get(&place_id()).await.expect("get").expect("entry");
    assert_eq!(hit.summary, "second");
}

#[ignore = "requires DATABASE_URL"]
#[sqlx::test(migrations = "../../migrations")]
async fn expired_rows_are_hidden_and_purged(pool: sqlx::PgPool) {
    sqlx::query(
        "INSERT INTO restaurant_cache (place_id, detail, fetched_at) \
         VALUES ($1, $2, NOW() - INTERVAL '2 hours')",
    )
    .bind(place_id().as_str())
    .bind(sqlx::types::Json(detail("stale")))
    .execute(&pool)
    .await
    .expect("seed stale row");

    let cache = PgRestaurantCache::new(pool, Some(Duration::from_secs(3600)));
    assert!(cache.get(&place_id()).await.expect("get").is_none());
    assert_eq!(cache.purge_expired().await.expect("purge"), 1);
}
