//! `TripAdvisor` Content API client.
//!
//! Location search narrows by a coarse address prefix, then the reviews and
//! details of the first hit are fetched concurrently. Details report `rating`
//! and `num_reviews` as strings or numbers depending on the endpoint version.

use platewise_core::{Platform, ProviderResult, Review};
use reqwest::Url;
use serde::Deserialize;

use super::{coarse_location, lenient_count, lenient_f64};
use crate::error::ProviderError;
use crate::http::{endpoint, parse_base_url, ProviderHttp, ProviderSettings};

const DEFAULT_BASE_URL: &str = "https://api.content.tripadvisor.com/api/v1/";
const ADDRESS_PREFIX_LEN: usize = 2;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<LocationHit>,
}

#[derive(Debug, Deserialize)]
struct LocationHit {
    #[serde(deserialize_with = "location_id")]
    location_id: String,
}

#[derive(Debug, Deserialize)]
struct ReviewsResponse {
    #[serde(default)]
    data: Vec<TripAdvisorReview>,
}

#[derive(Debug, Deserialize)]
struct TripAdvisorReview {
    #[serde(default)]
    user: TripAdvisorUser,
    #[serde(default)]
    text: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    rating: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct TripAdvisorUser {
    #[serde(default, alias = "name")]
    username: String,
}

#[derive(Debug, Deserialize)]
struct LocationDetails {
    #[serde(default, deserialize_with = "lenient_f64")]
    rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_count")]
    num_reviews: u64,
}

impl From<TripAdvisorReview> for Review {
    fn from(r: TripAdvisorReview) -> Self {
        Self {
            platform: Platform::TripAdvisor,
            author: r.user.username,
            text: r.text,
            rating: r.rating.unwrap_or_default(),
        }
    }
}

/// Location ids come back as numbers from some endpoints and strings from others.
fn location_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(u64),
        Text(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Number(n) => n.to_string(),
        Id::Text(s) => s,
    })
}

/// Client for the `TripAdvisor` Content API. Disabled when no API key is configured.
pub struct TripAdvisorClient {
    http: ProviderHttp,
    api_key: Option<String>,
    base_url: Url,
}

impl TripAdvisorClient {
    /// Creates a client pointed at the production Content API.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: Option<&str>, settings: &ProviderSettings) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, settings, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the client cannot be constructed, or
    /// [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: Option<&str>,
        settings: &ProviderSettings,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            http: ProviderHttp::new(Platform::TripAdvisor, settings)?,
            api_key: api_key.map(str::to_owned),
            base_url: parse_base_url(base_url)?,
        })
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Searches for `name` near the first characters of `address`, then
    /// fetches reviews and details for the first location.
    ///
    /// A disabled client returns [`ProviderResult::empty`] without any request.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::NoMatch`] if the search returns no location.
    /// - [`ProviderError::Deserialize`] if `rating` or `num_reviews` cannot
    ///   be read as a number.
    /// - [`ProviderError::Http`] or [`ProviderError::Status`] on transport failure.
    pub async fn try_details(
        &self,
        name: &str,
        address: &str,
        limit: usize,
    ) -> Result<ProviderResult, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!(provider = %Platform::TripAdvisor, "no API key configured, skipping");
            return Ok(ProviderResult::empty());
        };

        let prefix = coarse_location(address, ADDRESS_PREFIX_LEN);
        let search_url = endpoint(
            &self.base_url,
            &["location", "search"],
            &[("searchQuery", name), ("address", &prefix), ("key", api_key)],
        );
        let search: SearchResponse = self.http.get_json(&search_url, None).await?;
        let hit = search
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NoMatch {
                provider: Platform::TripAdvisor,
                query: name.to_owned(),
            })?;

        let id = hit.location_id.as_str();
        let reviews_url = endpoint(&self.base_url, &["location", id, "reviews"], &[("key", api_key)]);
        let details_url = endpoint(&self.base_url, &["location", id, "details"], &[("key", api_key)]);

        let (reviews, details) = tokio::try_join!(
            self.http.get_json::<ReviewsResponse>(&reviews_url, None),
            self.http.get_json::<LocationDetails>(&details_url, None),
        )?;

        Ok(ProviderResult {
            reviews: reviews
                .data
                .into_iter()
                .take(limit)
                .map(Review::from)
                .collect(),
            rating: details.rating,
            review_count: details.num_reviews,
        })
    }

    /// Absorbing form of [`Self::try_details`].
    pub async fn details(&self, name: &str, address: &str, limit: usize) -> ProviderResult {
        match self.try_details(name, address, limit).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    provider = %Platform::TripAdvisor,
                    restaurant = name,
                    error = %e,
                    "TripAdvisor details unavailable"
                );
                ProviderResult::empty()
            }
        }
    }
}
