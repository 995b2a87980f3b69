//! Provider clients: Google Places (primary), Yelp Fusion and `TripAdvisor`.
//!
//! Each secondary client exposes a fallible `try_details` used by tests and an
//! absorbing `details` that logs and returns [`ProviderResult::empty`] on any
//! failure.
//!
//! [`ProviderResult::empty`]: platewise_core::ProviderResult::empty

pub mod google;
pub mod tripadvisor;
pub mod yelp;

pub use google::{PlaceRecord, PlacesClient, Suggestion};
pub use tripadvisor::TripAdvisorClient;
pub use yelp::YelpClient;

use platewise_core::AppConfig;
use serde::{Deserialize, Deserializer};

use crate::error::ProviderError;
use crate::http::ProviderSettings;

/// The three provider clients the pipeline fans out to.
pub struct ReviewSources {
    pub places: PlacesClient,
    pub yelp: YelpClient,
    pub tripadvisor: TripAdvisorClient,
}

impl ReviewSources {
    /// Build production clients from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if an HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let settings = ProviderSettings::from_app_config(config);
        Ok(Self {
            places: PlacesClient::new(&config.google_api_key, &settings)?,
            yelp: YelpClient::new(config.yelp_api_key.as_deref(), &settings)?,
            tripadvisor: TripAdvisorClient::new(config.tripadvisor_api_key.as_deref(), &settings)?,
        })
    }
}

/// The first `len` characters of `address`.
///
/// `TripAdvisor`'s address filter is an exact match, so only a short prefix
/// (usually the street number) is sent.
pub(crate) fn coarse_location(address: &str, len: usize) -> String {
    address.trim().chars().take(len).collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn into_f64<E: serde::de::Error>(self) -> Result<Option<f64>, E> {
        match self {
            Self::Number(n) => Ok(Some(n)),
            Self::Text(s) if s.trim().is_empty() => Ok(None),
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| E::custom(format!("expected a number, got \"{s}\""))),
        }
    }
}

/// Accepts `4.5`, `"4.5"`, `null`, or `""`.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(value) => value.into_f64(),
        None => Ok(None),
    }
}

/// Accepts `120`, `"120"`, `null`, or `""`; absent values count as zero.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let Some(value) = Option::<NumberOrString>::deserialize(deserializer)? else {
        return Ok(0);
    };
    match value.into_f64::<D::Error>()? {
        None => Ok(0),
        Some(n) if n.is_finite() && n >= 0.0 && n.fract() == 0.0 => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Ok(n as u64)
        }
        Some(n) => Err(D::Error::custom(format!("expected a review count, got {n}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct LenientFields {
        #[serde(default, deserialize_with = "lenient_f64")]
        rating: Option<f64>,
        #[serde(default, deserialize_with = "lenient_count")]
        count: u64,
    }

    fn parse_lenient(json: &str) -> Result<LenientFields, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn coarse_location_takes_leading_chars() {
        assert_eq!(coarse_location("12 Main St", 2), "12");
        assert_eq!(coarse_location("  9", 2), "9");
        assert_eq!(coarse_location("", 2), "");
    }

    #[test]
    fn coarse_location_is_char_safe() {
        assert_eq!(coarse_location("Ünter den Linden", 2), "Ün");
    }

    #[test]
    fn lenient_fields_accept_strings_and_numbers() {
        let p = parse_lenient(r#"{"rating": "4.5", "count": "120"}"#).expect("strings");
        assert_eq!(p.rating, Some(4.5));
        assert_eq!(p.count, 120);

        let p = parse_lenient(r#"{"rating": 4, "count": 7}"#).expect("numbers");
        assert_eq!(p.rating, Some(4.0));
        assert_eq!(p.count, 7);
    }

    #[test]
    fn lenient_fields_treat_missing_and_null_as_absent() {
        let p = parse_lenient("{}").expect("missing");
        assert_eq!(p.rating, None);
        assert_eq!(p.count, 0);

        let p = parse_lenient(r#"{"rating": null, "count": null}"#).expect("null");
        assert_eq!(p.rating, None);
        assert_eq!(p.count, 0);
    }

    #[test]
    fn lenient_fields_reject_unparsable_text() {
        assert!(parse_lenient(r#"{"rating": "great"}"#).is_err());
        assert!(parse_lenient(r#"{"count": "-3"}"#).is_err());
    }
}
