use serde::{Deserialize, Serialize};

use crate::PlaceId;

/// Default cap on reviews pulled from any single provider.
pub const DEFAULT_MAX_REVIEWS: usize = 25;

/// Photos attached to a [`RestaurantDetail`] are capped at this many.
pub const MAX_PHOTOS: usize = 5;

/// The review provider a [`Review`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Google,
    Yelp,
    TripAdvisor,
}

impl Platform {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Yelp => "yelp",
            Self::TripAdvisor => "tripadvisor",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single review normalized from any provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub platform: Platform,
    pub author: String,
    pub text: String,
    /// Star rating in `[0.0, 5.0]`.
    pub rating: f64,
}

/// What one provider knows about a restaurant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProviderResult {
    /// At most `max_reviews` entries, in the order the provider returned them.
    pub reviews: Vec<Review>,
    /// `None` when the provider had no usable result. Not the same as `Some(0.0)`.
    pub rating: Option<f64>,
    pub review_count: u64,
}

impl ProviderResult {
    /// The zero value a provider degrades to on failure.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Reviews and rating merged across all providers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FusedReviewSet {
    pub reviews: Vec<Review>,
    /// Review-count-weighted rating rounded to 2 decimals; `None` when no
    /// provider reported a rating backed by at least one review.
    pub rating: Option<f64>,
    pub review_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub url: String,
}

/// The record served to the browser client and persisted in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDetail {
    pub place_id: PlaceId,
    pub name: String,
    pub address: String,
    pub rating: Option<f64>,
    pub reviews_count: u64,
    pub reviews: Vec<Review>,
    pub photos: Vec<Photo>,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_detail() -> RestaurantDetail {
        RestaurantDetail {
            place_id: PlaceId::parse("ChIJ_valid_id").expect("valid id"),
            name: "Trattoria Roma".to_string(),
            address: "12 Main St, Springfield".to_string(),
            rating: Some(4.25),
            reviews_count: 310,
            reviews: vec![Review {
                platform: Platform::TripAdvisor,
                author: "ana".to_string(),
                text: "Great carbonara".to_string(),
                rating: 5.0,
            }],
            photos: vec![Photo {
                url: "https://example.com/p.jpg".to_string(),
            }],
            summary: "Loved for pasta.".to_string(),
        }
    }

    #[test]
    fn restaurant_detail_serializes_in_camel_case() {
        let json = serde_json::to_value(sample_detail()).expect("serialize");
        assert_eq!(json["placeId"], "ChIJ_valid_id");
        assert_eq!(json["reviewsCount"], 310);
        assert_eq!(json["reviews"][0]["platform"], "TripAdvisor");
        assert_eq!(json["photos"][0]["url"], "https://example.com/p.jpg");
    }

    #[test]
    fn missing_rating_serializes_as_null() {
        let mut detail = sample_detail();
        detail.rating = None;
        let json = serde_json::to_value(&detail).expect("serialize");
        assert!(json["rating"].is_null());
    }

    #[test]
    fn restaurant_detail_survives_cache_serialization() {
        let detail = sample_detail();
        let json = serde_json::to_string(&detail).expect("serialize");
        let back: RestaurantDetail = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, detail);
    }

    #[test]
    fn empty_provider_result_has_no_rating() {
        let empty = ProviderResult::empty();
        assert!(empty.reviews.is_empty());
        assert_eq!(empty.rating, None);
        assert_eq!(empty.review_count, 0);
    }
}
