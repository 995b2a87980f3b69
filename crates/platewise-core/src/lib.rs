//! Shared domain types and configuration for platewise.

pub mod app_config;
pub mod config;
pub mod place;
pub mod restaurant;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use place::{PlaceId, PlaceIdentity, PLACE_ID_PREFIX};
pub use restaurant::{
    FusedReviewSet, Photo, Platform, ProviderResult, RestaurantDetail, Review,
    DEFAULT_MAX_REVIEWS, MAX_PHOTOS,
};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid place id \"{0}\": expected a Google place id starting with \"ChIJ\"")]
    InvalidPlaceId(String),

    #[error("restaurant identity must not be empty")]
    EmptyIdentity,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
