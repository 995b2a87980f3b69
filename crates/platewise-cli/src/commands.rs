//! Command handlers, called from `main` once config and cache are ready.
//!
//! Results are printed to stdout as pretty JSON; logs go to stderr.

use std::sync::Arc;

use platewise_core::AppConfig;
use platewise_db::RestaurantCache;
use platewise_reviews::RestaurantService;
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Look up one restaurant by place id or name and print its detail.
///
/// # Errors
///
/// Returns an error if the service cannot be built, the restaurant cannot
/// be found, or the output cannot be serialized.
pub(crate) async fn run_lookup(
    config: &AppConfig,
    cache: Arc<dyn RestaurantCache>,
    restaurant: &str,
) -> anyhow::Result<()> {
    let service = RestaurantService::from_config(config, cache)?;
    let detail = service.lookup(restaurant).await?;
    print_json(&detail)
}

/// Compare two restaurants and print the recommendation with both details.
///
/// # Errors
///
/// Returns an error if either restaurant cannot be found or the comparison
/// completion fails.
pub(crate) async fn run_compare(
    config: &AppConfig,
    cache: Arc<dyn RestaurantCache>,
    first: &str,
    second: &str,
) -> anyhow::Result<()> {
    let service = RestaurantService::from_config(config, cache)?;
    let comparison = service.compare(first, second).await?;
    print_json(&comparison)
}

#[derive(Debug, Serialize)]
struct PurgeReport {
    backend: &'static str,
    removed: u64,
}

/// Delete expired cache entries and report how many were removed.
///
/// # Errors
///
/// Returns an error if the cache backend fails.
pub(crate) async fn run_purge_cache(cache: &dyn RestaurantCache) -> anyhow::Result<()> {
    let removed = cache.purge_expired().await?;
    tracing::info!(backend = cache.backend(), removed, "cache purge complete");
    print_json(&PurgeReport {
        backend: cache.backend(),
        removed,
    })
}
