//! Review collection, rating fusion and the cached restaurant pipeline.
//!
//! Google Places is the primary provider: a restaurant exists only if Places
//! can describe it. Yelp and `TripAdvisor` add reviews and ratings when they
//! can, and silently contribute nothing when they cannot.

pub mod aggregate;
pub mod details;
pub mod error;
pub mod http;
pub(crate) mod retry;
pub mod service;
pub mod sources;

pub use aggregate::{aggregate_reviews, fuse, AggregationTarget};
pub use details::{assemble_details, AssembledRestaurant};
pub use error::{CompareError, LookupError, ProviderError, SetupError};
pub use http::ProviderSettings;
pub use service::{Comparison, RestaurantService};
pub use sources::{
    PlaceRecord, PlacesClient, ReviewSources, Suggestion, TripAdvisorClient, YelpClient,
};
