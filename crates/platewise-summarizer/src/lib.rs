//! LLM-backed review summaries for platewise.
//!
//! Wraps an OpenAI-compatible chat-completions endpoint. Summaries never
//! fail: empty input and upstream errors both produce fixed placeholder text.
//! Restaurant comparisons do surface errors to the caller.

pub mod client;
pub mod error;
pub mod prompts;

pub use client::SummaryClient;
pub use error::SummaryError;
pub use prompts::{SummaryMode, NO_REVIEWS_PLACEHOLDER};
