use thiserror::Error;

/// Errors from the chat-completions API.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No API key is configured, so no request was made.
    #[error("no completion API key configured")]
    MissingApiKey,

    /// The API answered with a non-2xx status.
    #[error("completion API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the chat-completions schema.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The API returned no choices or only whitespace.
    #[error("completion API returned an empty completion")]
    EmptyCompletion,
}
