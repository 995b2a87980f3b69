//! Assembling a restaurant record from the primary lookup plus fused reviews.

use platewise_core::{FusedReviewSet, Photo, PlaceId, RestaurantDetail, Review, MAX_PHOTOS};

use crate::aggregate::{aggregate_reviews, AggregationTarget};
use crate::error::LookupError;
use crate::sources::ReviewSources;

/// Everything needed for a [`RestaurantDetail`] except the summary.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledRestaurant {
    pub place_id: PlaceId,
    pub name: String,
    pub address: String,
    pub photos: Vec<Photo>,
    pub fused: FusedReviewSet,
}

impl AssembledRestaurant {
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        &self.fused.reviews
    }

    #[must_use]
    pub fn with_summary(self, summary: String) -> RestaurantDetail {
        RestaurantDetail {
            place_id: self.place_id,
            name: self.name,
            address: self.address,
            rating: self.fused.rating,
            reviews_count: self.fused.review_count,
            reviews: self.fused.reviews,
            photos: self.photos,
            summary,
        }
    }
}

/// Look up `place_id` on Google Places, then aggregate reviews from all providers.
///
/// # Errors
///
/// Returns [`LookupError::PrimaryLookup`] when the Places details call fails.
/// Secondary provider failures are absorbed.
pub async fn assemble_details(
    sources: &ReviewSources,
    place_id: &PlaceId,
    max_reviews: usize,
) -> Result<AssembledRestaurant, LookupError> {
    let record = sources
        .places
        .place_details(place_id)
        .await
        .map_err(|source| LookupError::PrimaryLookup {
            query: place_id.to_string(),
            source,
        })?;

    let photos = record
        .photo_references
        .iter()
        .take(MAX_PHOTOS)
        .map(|reference| Photo {
            url: sources.places.photo_url(reference),
        })
        .collect();

    let fused = aggregate_reviews(
        sources,
        AggregationTarget {
            place_id,
            name: &record.name,
            address: &record.address,
            primary_rating: record.rating,
            primary_count: record.review_count,
        },
        max_reviews,
    )
    .await;

    Ok(AssembledRestaurant {
        place_id: record.place_id,
        name: record.name,
        address: record.address,
        photos,
        fused,
    })
}
