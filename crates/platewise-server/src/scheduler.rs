//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the hourly
//! cache purge.

use std::sync::Arc;

use platewise_db::RestaurantCache;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Top of every hour.
const PURGE_SCHEDULE: &str = "0 0 * * * *";

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive for
/// the lifetime of the process. Dropping it shuts down all scheduled jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    cache: Arc<dyn RestaurantCache>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    register_cache_purge_job(&scheduler, cache).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_cache_purge_job(
    scheduler: &JobScheduler,
    cache: Arc<dyn RestaurantCache>,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(PURGE_SCHEDULE, move |_uuid, _lock| {
        let cache = Arc::clone(&cache);
        Box::pin(async move {
            purge_expired(cache.as_ref()).await;
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Delete expired cache entries, logging the outcome. Never fails.
pub(crate) async fn purge_expired(cache: &dyn RestaurantCache) -> u64 {
    match cache.purge_expired().await {
        Ok(removed) => {
            tracing::info!(
                backend = cache.backend(),
                removed,
                "scheduler: purged expired cache entries"
            );
            removed
        }
        Err(e) => {
            tracing::error!(
                backend = cache.backend(),
                error = %e,
                "scheduler: cache purge failed"
            );
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use platewise_core::{PlaceId, RestaurantDetail};
    use platewise_db::MemoryCache;

    use super::*;

    #[tokio::test]
    async fn purge_removes_only_expired_entries() {
        let cache = MemoryCache::new(Some(Duration::from_millis(5)));
        let id = PlaceId::parse("ChIJ_purge").expect("valid id");
        let detail = RestaurantDetail {
            place_id: id.clone(),
            name: "Old".to_string(),
            address: String::new(),
            rating: None,
            reviews_count: 0,
            reviews: Vec::new(),
            photos: Vec::new(),
            summary: String::new(),
        };
        cache.put(&id, &detail).await.expect("put");
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(purge_expired(&cache).await, 1);
        assert_eq!(purge_expired(&cache).await, 0);
    }
}
