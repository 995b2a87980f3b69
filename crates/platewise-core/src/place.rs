//! Restaurant identity: validated Google place ids and free-text names.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Every Google place id handed out by the Places API starts with this prefix.
pub const PLACE_ID_PREFIX: &str = "ChIJ";

/// A format-validated Google place id. This is the cache key for a restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlaceId(String);

impl PlaceId {
    /// Validate a raw place id.
    ///
    /// The id must start with [`PLACE_ID_PREFIX`], carry at least one more
    /// character, and contain only ASCII alphanumerics, `_` or `-`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPlaceId`] if the id does not match.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        let valid = trimmed
            .strip_prefix(PLACE_ID_PREFIX)
            .is_some_and(|rest| {
                !rest.is_empty()
                    && rest
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            });

        if valid {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(CoreError::InvalidPlaceId(raw.to_owned()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PlaceId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PlaceId> for String {
    fn from(id: PlaceId) -> Self {
        id.0
    }
}

/// What a caller typed to identify a restaurant.
///
/// Names still need to be resolved to a [`PlaceId`] before the review
/// pipeline can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceIdentity {
    Id(PlaceId),
    Name(String),
}

impl PlaceIdentity {
    /// Classify raw user input.
    ///
    /// Input starting with [`PLACE_ID_PREFIX`] is treated as a place id and
    /// must validate; anything else non-empty is a free-text name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyIdentity`] for blank input and
    /// [`CoreError::InvalidPlaceId`] for a malformed id.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::EmptyIdentity);
        }
        if trimmed.starts_with(PLACE_ID_PREFIX) {
            return PlaceId::parse(trimmed).map(Self::Id);
        }
        Ok(Self::Name(trimmed.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_google_place_id() {
        let id = PlaceId::parse("ChIJN1t_tDeuEmsRUsoyG83frY4").expect("valid id");
        assert_eq!(id.as_str(), "ChIJN1t_tDeuEmsRUsoyG83frY4");
    }

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let id = PlaceId::parse("  ChIJ_valid_id\n").expect("valid id");
        assert_eq!(id.to_string(), "ChIJ_valid_id");
    }

    #[test]
    fn parse_rejects_missing_prefix() {
        assert_eq!(
            PlaceId::parse("not-a-valid-id"),
            Err(CoreError::InvalidPlaceId("not-a-valid-id".to_string()))
        );
    }

    #[test]
    fn parse_rejects_bare_prefix() {
        assert!(PlaceId::parse("ChIJ").is_err());
    }

    #[test]
    fn parse_rejects_url_unsafe_characters() {
        assert!(PlaceId::parse("ChIJabc&key=stolen").is_err());
        assert!(PlaceId::parse("ChIJabc def").is_err());
    }

    #[test]
    fn identity_classifies_ids_and_names() {
        assert_eq!(
            PlaceIdentity::parse("ChIJ_valid_id"),
            Ok(PlaceIdentity::Id(PlaceId("ChIJ_valid_id".to_string())))
        );
        assert_eq!(
            PlaceIdentity::parse(" Joe's Pizza Broadway "),
            Ok(PlaceIdentity::Name("Joe's Pizza Broadway".to_string()))
        );
    }

    #[test]
    fn identity_with_prefix_must_validate() {
        assert!(matches!(
            PlaceIdentity::parse("ChIJ bad id"),
            Err(CoreError::InvalidPlaceId(_))
        ));
    }

    #[test]
    fn identity_rejects_blank_input() {
        assert_eq!(PlaceIdentity::parse("   "), Err(CoreError::EmptyIdentity));
    }

    #[test]
    fn place_id_deserialization_validates() {
        let ok: Result<PlaceId, _> = serde_json::from_str("\"ChIJ_valid_id\"");
        assert!(ok.is_ok());
        let bad: Result<PlaceId, _> = serde_json::from_str("\"nope\"");
        assert!(bad.is_err());
    }
}
