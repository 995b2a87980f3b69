//! Review aggregation and rating fusion across the three providers.

use platewise_core::{FusedReviewSet, PlaceId, ProviderResult};

use crate::sources::ReviewSources;

/// What the primary lookup already knows about the restaurant being aggregated.
#[derive(Debug, Clone, Copy)]
pub struct AggregationTarget<'a> {
    pub place_id: &'a PlaceId,
    pub name: &'a str,
    pub address: &'a str,
    pub primary_rating: Option<f64>,
    pub primary_count: u64,
}

/// Fan out to all three providers concurrently and fuse the results.
///
/// Google's rating and count are taken from the primary record instead of
/// being fetched again. Never fails: each provider degrades to
/// [`ProviderResult::empty`] on its own.
pub async fn aggregate_reviews(
    sources: &ReviewSources,
    target: AggregationTarget<'_>,
    max_reviews: usize,
) -> FusedReviewSet {
    let (google_reviews, yelp, tripadvisor) = tokio::join!(
        sources.places.reviews(target.place_id, max_reviews),
        sources.yelp.details(target.name, target.address, max_reviews),
        sources
            .tripadvisor
            .details(target.name, target.address, max_reviews),
    );

    let google = ProviderResult {
        reviews: google_reviews,
        rating: target.primary_rating,
        review_count: target.primary_count,
    };

    tracing::debug!(
        place_id = %target.place_id,
        google = google.reviews.len(),
        yelp = yelp.reviews.len(),
        tripadvisor = tripadvisor.reviews.len(),
        "provider results collected"
    );

    fuse([google, yelp, tripadvisor])
}

/// Merge provider results into one review list and a count-weighted rating.
///
/// - `review_count` is the sum over every provider.
/// - Each rated provider adds `rating * count` to the numerator; the
///   denominator is the full `review_count`, so unrated counts dilute it.
/// - A zero total gives `rating: None`.
/// - Reviews are concatenated in input order.
pub fn fuse(results: impl IntoIterator<Item = ProviderResult>) -> FusedReviewSet {
    let mut fused = FusedReviewSet::default();
    let mut weighted_sum = 0.0_f64;

    for result in results {
        fused.review_count += result.review_count;
        if let Some(rating) = result.rating {
            #[allow(clippy::cast_precision_loss)]
            let weight = result.review_count as f64;
            weighted_sum += rating * weight;
        }
        fused.reviews.extend(result.reviews);
    }

    if fused.review_count > 0 {
        #[allow(clippy::cast_precision_loss)]
        let average = weighted_sum / fused.review_count as f64;
        fused.rating = Some(round2(average));
    }

    fused
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use platewise_core::{Platform, Review};

    use super::*;

    fn review(platform: Platform, author: &str) -> Review {
        Review {
            platform,
            author: author.to_string(),
            text: format!("{author} says hi"),
            rating: 4.0,
        }
    }

    fn result(rating: Option<f64>, count: u64, reviews: Vec<Review>) -> ProviderResult {
        ProviderResult {
            reviews,
            rating,
            review_count: count,
        }
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("rating should be present");
        assert!(
            (actual - expected).abs() <= 0.01,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn weights_ratings_by_review_count() {
        let fused = fuse([
            result(Some(4.0), 100, vec![]),
            result(Some(3.0), 50, vec![]),
            result(None, 0, vec![]),
        ]);
        assert_close(fused.rating, 3.67);
        assert_eq!(fused.review_count, 150);
    }

    #[test]
    fn rounds_to_two_decimals() {
        let fused = fuse([result(Some(4.0), 2, vec![]), result(Some(3.0), 1, vec![])]);
        assert_eq!(fused.rating, Some(3.67));
    }

    #[test]
    fn failed_provider_contributes_nothing() {
        let fused = fuse([
            result(Some(4.5), 200, vec![]),
            ProviderResult::empty(),
            result(Some(3.5), 200, vec![]),
        ]);
        assert_close(fused.rating, 4.0);
        assert_eq!(fused.review_count, 400);
    }

    #[test]
    fn all_providers_failing_yields_no_rating() {
        let fused = fuse([
            ProviderResult::empty(),
            ProviderResult::empty(),
            ProviderResult::empty(),
        ]);
        assert_eq!(fused.rating, None);
        assert_eq!(fused.review_count, 0);
        assert!(fused.reviews.is_empty());
    }

    #[test]
    fn unrated_counts_dilute_the_weighted_rating() {
        let fused = fuse([result(Some(5.0), 10, vec![]), result(None, 90, vec![])]);
        assert_eq!(fused.rating, Some(0.5));
        assert_eq!(fused.review_count, 100);
    }

    #[test]
    fn unrated_tripadvisor_count_joins_the_denominator() {
        let fused = fuse([
            result(Some(4.0), 100, vec![]),
            ProviderResult::empty(),
            result(None, 312, vec![]),
        ]);
        assert_close(fused.rating, 0.97);
        assert_eq!(fused.review_count, 412);
    }

    #[test]
    fn rating_without_reviews_is_ignored() {
        let fused = fuse([result(Some(1.0), 0, vec![])]);
        assert_eq!(fused.rating, None);
        assert_eq!(fused.review_count, 0);
    }

    #[test]
    fn concatenates_reviews_in_provider_order() {
        let fused = fuse([
            result(
                Some(4.0),
                2,
                vec![review(Platform::Google, "g1"), review(Platform::Google, "g2")],
            ),
            result(Some(4.0), 1, vec![review(Platform::Yelp, "y1")]),
            result(Some(4.0), 1, vec![review(Platform::TripAdvisor, "t1")]),
        ]);
        let authors: Vec<&str> = fused.reviews.iter().map(|r| r.author.as_str()).collect();
        assert_eq!(authors, ["g1", "g2", "y1", "t1"]);
    }
}
