use platewise_core::{CoreError, Platform};
use platewise_summarizer::SummaryError;
use thiserror::Error;

/// A single provider call failed. Absorbed inside the provider clients,
/// except for the primary Places lookup.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network or TLS failure from the underlying HTTP client. The request
    /// URL is stripped on conversion because its query carries API keys.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// The provider answered with a non-2xx HTTP status.
    #[error("{provider} returned HTTP {status}")]
    Status { provider: Platform, status: u16 },

    /// The provider answered 200 but reported an error in its envelope.
    #[error("{provider} API error {status}: {message}")]
    Api {
        provider: Platform,
        status: String,
        message: String,
    },

    /// The response body did not match the expected schema.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A search returned nothing for the query.
    #[error("{provider} has no match for \"{query}\"")]
    NoMatch { provider: Platform, query: String },

    /// The provider's response lacked a field the lookup depends on.
    #[error("{provider} response is missing {field}")]
    MissingField {
        provider: Platform,
        field: &'static str,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}

/// A restaurant could not be produced at all.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The identity was malformed; nothing was fetched.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// The identity could not be resolved by the primary provider.
    #[error("restaurant not found: {query}")]
    PrimaryLookup {
        query: String,
        #[source]
        source: ProviderError,
    },
}

#[derive(Debug, Error)]
pub enum CompareError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("comparison unavailable: {0}")]
    Summary(#[from] SummaryError),
}

/// Failure wiring clients together from configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Summary(#[from] SummaryError),
}
