//! Yelp Fusion client: business search followed by that business's reviews.

use platewise_core::{Platform, ProviderResult, Review};
use reqwest::Url;
use serde::Deserialize;

use crate::error::ProviderError;
use crate::http::{endpoint, parse_base_url, ProviderHttp, ProviderSettings};

const DEFAULT_BASE_URL: &str = "https://api.yelp.com/v3/";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    businesses: Vec<Business>,
}

#[derive(Debug, Deserialize)]
struct Business {
    id: String,
    rating: Option<f64>,
    #[serde(default)]
    review_count: u64,
}

#[derive(Debug, Deserialize)]
struct ReviewsResponse {
    #[serde(default)]
    reviews: Vec<YelpReview>,
}

#[derive(Debug, Deserialize)]
struct YelpReview {
    #[serde(default)]
    user: YelpUser,
    #[serde(default)]
    text: String,
    rating: f64,
}

#[derive(Debug, Default, Deserialize)]
struct YelpUser {
    #[serde(default)]
    name: String,
}

impl From<YelpReview> for Review {
    fn from(r: YelpReview) -> Self {
        Self {
            platform: Platform::Yelp,
            author: r.user.name,
            text: r.text,
            rating: r.rating,
        }
    }
}

/// Client for the Yelp Fusion API. Disabled when no API key is configured.
pub struct YelpClient {
    http: ProviderHttp,
    api_key: Option<String>,
    base_url: Url,
}

impl YelpClient {
    /// Creates a client pointed at the production Yelp API.
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
            http: ProviderHttp::new(Platform::Yelp, settings)?,
            api_key: api_key.map(str::to_owned),
            base_url: parse_base_url(base_url)?,
        })
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Finds the best match for `name` near `location` and fetches up to
    /// `limit` of its reviews. Rating and count come from the matched business.
    ///
    /// A disabled client returns [`ProviderResult::empty`] without any request.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::NoMatch`] if the search returns no business.
    /// - [`ProviderError::Http`], [`ProviderError::Status`] or
    ///   [`ProviderError::Deserialize`] on transport or schema failure.
    pub async fn try_details(
        &self,
        name: &str,
        location: &str,
        limit: usize,
    ) -> Result<ProviderResult, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!(provider = %Platform::Yelp, "no API key configured, skipping");
            return Ok(ProviderResult::empty());
        };

        let search_url = endpoint(
            &self.base_url,
            &["businesses", "search"],
            &[("term", name), ("location", location), ("limit", "1")],
        );
        let search: SearchResponse = self.http.get_json(&search_url, Some(api_key)).await?;
        let business = search
            .businesses
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NoMatch {
                provider: Platform::Yelp,
                query: name.to_owned(),
            })?;

        let reviews_url = endpoint(&self.base_url, &["businesses", &business.id, "reviews"], &[]);
        let reviews: ReviewsResponse = self.http.get_json(&reviews_url, Some(api_key)).await?;

        Ok(ProviderResult {
            reviews: reviews
                .reviews
                .into_iter()
                .take(limit)
                .map(Review::from)
                .collect(),
            rating: business.rating,
            review_count: business.review_count,
        })
    }

    /// Absorbing form of [`Self::try_details`].
    pub async fn details(&self, name: &str, location: &str, limit: usize) -> ProviderResult {
        match self.try_details(name, location, limit).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    provider = %Platform::Yelp,
                    restaurant = name,
                    error = %e,
                    "Yelp details unavailable"
                );
                ProviderResult::empty()
            }
        }
    }
}
