//! Google Places client: place details, reviews, text search, autocomplete
//! and photo URLs.
//!
//! Every Places response carries a `status` field; anything other than `OK`
//! (or `ZERO_RESULTS` where an empty answer is meaningful) is surfaced as
//! [`ProviderError::Api`].

use platewise_core::{PlaceId, Platform, Review};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::http::{endpoint, parse_base_url, ProviderHttp, ProviderSettings};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";
const DETAIL_FIELDS: &str = "name,formatted_address,rating,user_ratings_total,photos";
const AUTOCOMPLETE_RADIUS_METERS: &str = "50000";
const PHOTO_MAX_WIDTH: &str = "400";

/// Primary record for a place, fetched once per assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRecord {
    pub place_id: PlaceId,
    pub name: String,
    pub address: String,
    pub rating: Option<f64>,
    pub review_count: u64,
    /// Opaque photo references in provider order; see [`PlacesClient::photo_url`].
    pub photo_references: Vec<String>,
}

/// One autocomplete prediction, forwarded to the browser as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub description: String,
    pub place_id: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(flatten)]
    body: T,
}

#[derive(Debug, Deserialize)]
struct DetailsBody<R> {
    result: Option<R>,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    name: String,
    #[serde(default)]
    formatted_address: String,
    rating: Option<f64>,
    #[serde(default)]
    user_ratings_total: u64,
    #[serde(default)]
    photos: Vec<PhotoRef>,
}

#[derive(Debug, Deserialize)]
struct PhotoRef {
    photo_reference: String,
}

#[derive(Debug, Deserialize)]
struct ReviewsResult {
    reviews: Option<Vec<GoogleReview>>,
}

#[derive(Debug, Deserialize)]
struct GoogleReview {
    #[serde(default)]
    author_name: String,
    #[serde(default)]
    text: String,
    rating: f64,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    place_id: String,
}

#[derive(Debug, Deserialize)]
struct AutocompleteBody {
    #[serde(default)]
    predictions: Vec<Suggestion>,
}

impl<T> Envelope<T> {
    /// `Ok(true)` for `OK`, `Ok(false)` for `ZERO_RESULTS`, error otherwise.
    fn check(&self) -> Result<bool, ProviderError> {
        match self.status.as_str() {
            "OK" => Ok(true),
            "ZERO_RESULTS" => Ok(false),
            other => Err(ProviderError::Api {
                provider: Platform::Google,
                status: other.to_owned(),
                message: self.error_message.clone().unwrap_or_default(),
            }),
        }
    }
}

impl From<GoogleReview> for Review {
    fn from(r: GoogleReview) -> Self {
        Self {
            platform: Platform::Google,
            author: r.author_name,
            text: r.text,
            rating: r.rating,
        }
    }
}

/// Client for the Google Places web service.
pub struct PlacesClient {
    http: ProviderHttp,
    api_key: String,
    base_url: Url,
}

impl PlacesClient {
    /// Creates a client pointed at the production Places API.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, settings: &ProviderSettings) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, settings, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the client cannot be constructed, or
    /// [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        settings: &ProviderSettings,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            http: ProviderHttp::new(Platform::Google, settings)?,
            api_key: api_key.to_owned(),
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Fetches name, address, rating, rating count and photo references.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Api`] if the status is anything but `OK`.
    /// - [`ProviderError::MissingField`] if the envelope has no `result`.
    /// - [`ProviderError::Http`], [`ProviderError::Status`] or
    ///   [`ProviderError::Deserialize`] on transport or schema failure.
    pub async fn place_details(&self, place_id: &PlaceId) -> Result<PlaceRecord, ProviderError> {
        let url = self.url(
            &["details", "json"],
            &[("place_id", place_id.as_str()), ("fields", DETAIL_FIELDS)],
        );
        let envelope: Envelope<DetailsBody<DetailsResult>> = self.http.get_json(&url, None).await?;
        if !envelope.check()? {
            return Err(no_match(place_id.as_str()));
        }
        let result = envelope.body.result.ok_or(ProviderError::MissingField {
            provider: Platform::Google,
            field: "result",
        })?;

        Ok(PlaceRecord {
            place_id: place_id.clone(),
            name: result.name,
            address: result.formatted_address,
            rating: result.rating,
            review_count: result.user_ratings_total,
            photo_references: result
                .photos
                .into_iter()
                .map(|p| p.photo_reference)
                .collect(),
        })
    }

    /// Fetches up to `limit` reviews for a place.
    ///
    /// # Errors
    ///
    /// Same as [`Self::place_details`]; a result without a `reviews` array is
    /// [`ProviderError::MissingField`].
    pub async fn try_reviews(
        &self,
        place_id: &PlaceId,
        limit: usize,
    ) -> Result<Vec<Review>, ProviderError> {
        let url = self.url(
            &["details", "json"],
            &[("place_id", place_id.as_str()), ("fields", "reviews")],
        );
        let envelope: Envelope<DetailsBody<ReviewsResult>> = self.http.get_json(&url, None).await?;
        if !envelope.check()? {
            return Err(no_match(place_id.as_str()));
        }
        let reviews = envelope
            .body
            .result
            .and_then(|r| r.reviews)
            .ok_or(ProviderError::MissingField {
                provider: Platform::Google,
                field: "reviews",
            })?;

        Ok(reviews.into_iter().take(limit).map(Review::from).collect())
    }

    /// Absorbing form of [`Self::try_reviews`]: failures yield an empty list.
    pub async fn reviews(&self, place_id: &PlaceId, limit: usize) -> Vec<Review> {
        match self.try_reviews(place_id, limit).await {
            Ok(reviews) => reviews,
            Err(e) => {
                tracing::warn!(
                    provider = %Platform::Google,
                    place_id = %place_id,
                    error = %e,
                    "Google reviews unavailable"
                );
                Vec::new()
            }
        }
    }

    /// Resolves a free-text restaurant name to the first matching place id.
    ///
    /// # Errors
    ///
    /// [`ProviderError::NoMatch`] when the search is empty, or when the top
    /// result's id is not a well-formed place id. Transport and status
    /// failures as for [`Self::place_details`].
    pub async fn search_by_name(&self, name: &str) -> Result<PlaceId, ProviderError> {
        let url = self.url(&["textsearch", "json"], &[("query", name)]);
        let envelope: Envelope<SearchBody> = self.http.get_json(&url, None).await?;
        envelope.check()?;

        let first = envelope
            .body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| no_match(name))?;

        PlaceId::parse(&first.place_id).map_err(|e| {
            tracing::warn!(name, error = %e, "text search returned a malformed place id");
            no_match(name)
        })
    }

    /// Place predictions biased to a 50 km radius around `(lat, lng)`.
    ///
    /// # Errors
    ///
    /// [`ProviderError::Api`] for statuses other than `OK`/`ZERO_RESULTS`,
    /// plus transport and schema failures.
    pub async fn autocomplete(
        &self,
        input: &str,
        lat: f64,
        lng: f64,
    ) -> Result<Vec<Suggestion>, ProviderError> {
        let location = format!("{lat},{lng}");
        let url = self.url(
            &["autocomplete", "json"],
            &[
                ("input", input),
                ("location", &location),
                ("radius", AUTOCOMPLETE_RADIUS_METERS),
            ],
        );
        let envelope: Envelope<AutocompleteBody> = self.http.get_json(&url, None).await?;
        if !envelope.check()? {
            return Ok(Vec::new());
        }
        Ok(envelope.body.predictions)
    }

    /// Externally resolvable URL for a photo reference.
    #[must_use]
    pub fn photo_url(&self, reference: &str) -> String {
        endpoint(
            &self.base_url,
            &["photo"],
            &[
                ("maxwidth", PHOTO_MAX_WIDTH),
                ("photoreference", reference),
                ("key", &self.api_key),
            ],
        )
        .into()
    }

    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = endpoint(&self.base_url, segments, query);
        url.query_pairs_mut().append_pair("key", &self.api_key);
        url
    }
}

fn no_match(query: &str) -> ProviderError {
    ProviderError::NoMatch {
        provider: Platform::Google,
        query: query.to_owned(),
    }
}
