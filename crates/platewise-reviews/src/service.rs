//! The cached restaurant pipeline: validate, cache, assemble, summarize, store.

use std::sync::Arc;

use platewise_core::{AppConfig, PlaceId, PlaceIdentity, RestaurantDetail, Review};
use platewise_db::RestaurantCache;
use platewise_summarizer::{SummaryClient, SummaryMode};
use serde::Serialize;

use crate::details::assemble_details;
use crate::error::{CompareError, LookupError, ProviderError, SetupError};
use crate::sources::{ReviewSources, Suggestion};

/// Result of comparing two restaurants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub comparison: String,
    pub first: RestaurantDetail,
    pub second: RestaurantDetail,
}

pub struct RestaurantService {
    sources: ReviewSources,
    summarizer: SummaryClient,
    cache: Arc<dyn RestaurantCache>,
    max_reviews: usize,
}

impl RestaurantService {
    #[must_use]
    pub fn new(
        sources: ReviewSources,
        summarizer: SummaryClient,
        cache: Arc<dyn RestaurantCache>,
        max_reviews: usize,
    ) -> Self {
        Self {
            sources,
            summarizer,
            cache,
            max_reviews,
        }
    }

    /// Wire production clients from configuration around an existing cache.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if any HTTP client cannot be constructed.
    pub fn from_config(
        config: &AppConfig,
        cache: Arc<dyn RestaurantCache>,
    ) -> Result<Self, SetupError> {
        let sources = ReviewSources::from_config(config)?;
        let summarizer = SummaryClient::new(
            config.openai_api_key.as_deref(),
            &config.openai_model,
            config.provider_timeout_secs,
        )?;
        Ok(Self::new(sources, summarizer, cache, config.max_reviews))
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<dyn RestaurantCache> {
        &self.cache
    }

    /// Cached detail for `place_id`, assembling and storing it on a miss.
    ///
    /// Cache failures are logged and treated as a miss (on read) or ignored
    /// (on write). A failed assembly is never stored, and neither is a detail
    /// whose brief summary fell back to the unavailable message.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::PrimaryLookup`] if Google Places cannot resolve
    /// the place.
    pub async fn detail(&self, place_id: &PlaceId) -> Result<RestaurantDetail, LookupError> {
        match self.cache.get(place_id).await {
            Ok(Some(detail)) => {
                tracing::debug!(place_id = %place_id, "cache hit");
                return Ok(detail);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    place_id = %place_id,
                    backend = self.cache.backend(),
                    error = %e,
                    "cache read failed, treating as miss"
                );
            }
        }

        let assembled = assemble_details(&self.sources, place_id, self.max_reviews).await?;
        // Placeholder summaries from a configured summarizer are not cached.
        let (summary, cacheable) = match self
            .summarizer
            .try_summarize(assembled.reviews(), SummaryMode::Brief)
            .await
        {
            Ok(text) => (text, true),
            Err(e) => {
                tracing::warn!(
                    place_id = %place_id,
                    error = %e,
                    "summary generation failed; using placeholder"
                );
                (
                    SummaryMode::Brief.unavailable_message().to_string(),
                    !self.summarizer.is_configured(),
                )
            }
        };
        let detail = assembled.with_summary(summary);

        if !cacheable {
            tracing::debug!(place_id = %place_id, "skipping cache write for placeholder summary");
        } else if let Err(e) = self.cache.put(place_id, &detail).await {
            tracing::warn!(
                place_id = %place_id,
                backend = self.cache.backend(),
                error = %e,
                "cache write failed, returning unsaved result"
            );
        }

        tracing::info!(
            place_id = %place_id,
            rating = ?detail.rating,
            reviews_count = detail.reviews_count,
            "restaurant assembled"
        );
        Ok(detail)
    }

    /// Accept either a place id or a restaurant name.
    ///
    /// # Errors
    ///
    /// - [`LookupError::Validation`] for empty input or a malformed `ChIJ` id,
    ///   before any network call.
    /// - [`LookupError::PrimaryLookup`] if the name has no match or the place
    ///   cannot be fetched.
    pub async fn lookup(&self, raw: &str) -> Result<RestaurantDetail, LookupError> {
        let place_id = self.resolve(raw).await?;
        self.detail(&place_id).await
    }

    /// Turn raw user input into a place id, searching by name when needed.
    ///
    /// # Errors
    ///
    /// Same as [`Self::lookup`], minus the details fetch.
    pub async fn resolve(&self, raw: &str) -> Result<PlaceId, LookupError> {
        match PlaceIdentity::parse(raw)? {
            PlaceIdentity::Id(id) => Ok(id),
            PlaceIdentity::Name(name) => self
                .sources
                .places
                .search_by_name(&name)
                .await
                .map_err(|source| LookupError::PrimaryLookup {
                    query: name.clone(),
                    source,
                }),
        }
    }

    /// Fetch both restaurants concurrently and ask for a recommendation.
    ///
    /// # Errors
    ///
    /// - [`CompareError::Lookup`] if either restaurant cannot be produced.
    /// - [`CompareError::Summary`] if the comparison completion fails.
    pub async fn compare(&self, first: &str, second: &str) -> Result<Comparison, CompareError> {
        let (first, second) = tokio::try_join!(self.lookup(first), self.lookup(second))?;

        let comparison = self
            .summarizer
            .compare(&first.name, &first.reviews, &second.name, &second.reviews)
            .await?;

        Ok(Comparison {
            comparison,
            first,
            second,
        })
    }

    /// Detailed analysis of arbitrary reviews. Never fails.
    pub async fn analyze(&self, reviews: &[Review]) -> String {
        self.summarizer
            .summarize(reviews, SummaryMode::Detailed)
            .await
    }

    /// Place predictions near `(lat, lng)`.
    ///
    /// # Errors
    ///
    /// Returns the [`ProviderError`] from Google Places.
    pub async fn autocomplete(
        &self,
        input: &str,
        lat: f64,
        lng: f64,
    ) -> Result<Vec<Suggestion>, ProviderError> {
        self.sources.places.autocomplete(input, lat, lng).await
    }
}
