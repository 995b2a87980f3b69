//! Shared HTTP plumbing for the provider clients: URL building, status
//! checks, typed JSON decoding and retries.

use std::time::Duration;

use platewise_core::{AppConfig, Platform};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::retry::retry_with_backoff;

/// Timeout and retry knobs applied to every provider request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderSettings {
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

impl ProviderSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.provider_timeout_secs,
            max_retries: config.provider_max_retries,
            retry_backoff_ms: config.provider_retry_backoff_ms,
        }
    }
}

/// A `reqwest::Client` bound to one provider.
#[derive(Debug, Clone)]
pub(crate) struct ProviderHttp {
    client: Client,
    settings: ProviderSettings,
    provider: Platform,
}

impl ProviderHttp {
    pub(crate) fn new(provider: Platform, settings: &ProviderSettings) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("platewise/0.1 (review-aggregation)")
            .build()?;

        Ok(Self {
            client,
            settings: *settings,
            provider,
        })
    }

    /// GET `url` and decode the body as `T`, retrying transient failures.
    ///
    /// Deserialization errors carry only the URL path as context; query
    /// strings hold API keys and must not reach the logs.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        bearer: Option<&str>,
    ) -> Result<T, ProviderError> {
        retry_with_backoff(
            self.settings.max_retries,
            self.settings.retry_backoff_ms,
            || self.get_json_once(url, bearer),
        )
        .await
    }

    async fn get_json_once<T: DeserializeOwned>(
        &self,
        url: &Url,
        bearer: Option<&str>,
    ) -> Result<T, ProviderError> {
        let mut request = self.client.get(url.clone());
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: self.provider,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
            context: format!("{} {}", self.provider, url.path()),
            source: e,
        })
    }
}

/// Parse a provider base URL, normalised to end in exactly one slash.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, ProviderError> {
    let normalised = format!("{}/", raw.trim_end_matches('/'));
    let url = Url::parse(&normalised).map_err(|e| ProviderError::InvalidBaseUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(ProviderError::InvalidBaseUrl {
            url: raw.to_owned(),
            reason: "URL cannot be used as a base".to_owned(),
        });
    }
    Ok(url)
}

/// Append path `segments` (percent-encoded) and `query` pairs to `base`.
pub(crate) fn endpoint(base: &Url, segments: &[&str], query: &[(&str, &str)]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in query {
            pairs.append_pair(k, v);
        }
    }
    url
}
