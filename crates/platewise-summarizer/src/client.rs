//! HTTP client for an OpenAI-compatible chat-completions API.

use std::time::Duration;

use platewise_core::Review;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::SummaryError;
use crate::prompts::{
    compare_system_prompt, compare_user_prompt, summary_user_prompt, SummaryMode,
    NO_REVIEWS_PLACEHOLDER,
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const SUMMARY_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Generates review summaries and restaurant comparisons.
///
/// Without an API key the client stays usable: summaries return their
/// unavailable placeholder and comparisons return [`SummaryError::MissingApiKey`].
pub struct SummaryClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    completions_url: String,
}

impl SummaryClient {
    /// Creates a client pointed at the production `OpenAI` API.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: Option<&str>,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, SummaryError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        api_key: Option<&str>,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SummaryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.map(str::to_owned),
            model: model.to_owned(),
            completions_url: format!("{}/v1/chat/completions", base_url.trim_end_matches('/')),
        })
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Summarize `reviews` in the given mode.
    ///
    /// Never fails: an empty review list yields [`NO_REVIEWS_PLACEHOLDER`]
    /// without touching the network, and any API failure yields
    /// [`SummaryMode::unavailable_message`].
    pub async fn summarize(&self, reviews: &[Review], mode: SummaryMode) -> String {
        match self.try_summarize(reviews, mode).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    mode = ?mode,
                    reviews = reviews.len(),
                    error = %e,
                    "summary generation failed; using placeholder"
                );
                mode.unavailable_message().to_string()
            }
        }
    }

    /// Like [`Self::summarize`], but surfaces the completion failure.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError`] if no API key is configured or the completion
    /// request fails. An empty review list is never an error.
    pub async fn try_summarize(
        &self,
        reviews: &[Review],
        mode: SummaryMode,
    ) -> Result<String, SummaryError> {
        if reviews.is_empty() {
            return Ok(NO_REVIEWS_PLACEHOLDER.to_string());
        }

        let prompt = summary_user_prompt(mode, reviews);
        self.complete(mode.system_prompt(), &prompt, Some(SUMMARY_TEMPERATURE))
            .await
    }

    /// Compare two restaurants from their reviews and recommend one.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError`] if no API key is configured or the completion
    /// request fails.
    pub async fn compare(
        &self,
        first_name: &str,
        first_reviews: &[Review],
        second_name: &str,
        second_reviews: &[Review],
    ) -> Result<String, SummaryError> {
        let prompt = compare_user_prompt(first_name, first_reviews, second_name, second_reviews);
        self.complete(compare_system_prompt(), &prompt, None).await
    }

    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: Option<f32>,
    ) -> Result<String, SummaryError> {
        let api_key = self.api_key.as_deref().ok_or(SummaryError::MissingApiKey)?;

        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
        };

        let response = self
            .client
            .post(&self.completions_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&text)
                .map_or_else(|_| text.clone(), |envelope| envelope.error.message);
            return Err(SummaryError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| SummaryError::Deserialize {
                context: "chat completion".to_string(),
                source: e,
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(SummaryError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completions_url_strips_trailing_slash() {
        let client = SummaryClient::with_base_url(Some("k"), "m", 5, "http://localhost:9/")
            .expect("client construction should not fail");
        assert_eq!(
            client.completions_url,
            "http://localhost:9/v1/chat/completions"
        );
    }

    #[test]
    fn chat_request_omits_missing_temperature() {
        let body = ChatRequest {
            model: "gpt",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "s",
                },
                ChatMessage {
                    role: "user",
                    content: "u",
                },
            ],
            temperature: None,
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert!(json.get("temperature").is_none());
        assert_eq!(json["messages"][1]["role"], "user");
    }

    #[tokio::test]
    async fn unconfigured_client_compares_with_missing_key_error() {
        let client = SummaryClient::with_base_url(None, "m", 5, "http://127.0.0.1:1")
            .expect("client construction should not fail");
        let result = client.compare("a", &[], "b", &[]).await;
        assert!(matches!(result, Err(SummaryError::MissingApiKey)));
    }
}
