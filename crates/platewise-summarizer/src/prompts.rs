//! Fixed instruction templates for each kind of completion.

use platewise_core::Review;

/// Returned without calling the API when there is nothing to summarize.
pub const NO_REVIEWS_PLACEHOLDER: &str = "No reviews available to summarize.";

const COMPARE_SYSTEM_PROMPT: &str = "You are an assistant that compares restaurant reviews.";

const COMPARE_INSTRUCTION: &str = "Compare these two restaurants based on customer feedback. \
Give a recommendation to the user based on them. Give plain text without any formatting \
because this is displayed in my application:";

/// How much depth a summary should go into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryMode {
    /// Short holistic overview, attached to every restaurant detail.
    Brief,
    /// The "analyze more" pass: themes, strengths, weaknesses and patterns.
    Detailed,
}

impl SummaryMode {
    #[must_use]
    pub fn system_prompt(self) -> &'static str {
        match self {
            Self::Brief => "You are a helpful assistant that summarizes restaurant reviews.",
            Self::Detailed => {
                "You are a helpful assistant that analyzes restaurant reviews in detail."
            }
        }
    }

    #[must_use]
    pub fn instruction(self) -> &'static str {
        match self {
            Self::Brief => {
                "Based on the following customer reviews, provide a clear, concise, and overall \
                 summary of the restaurant's performance, including key themes, common feedback, \
                 strengths, and weaknesses. Do not summarize each review individually, but rather \
                 provide a holistic view of what customers are saying overall:"
            }
            Self::Detailed => {
                "Here are some reviews for a restaurant. Please analyze them in greater detail, \
                 highlighting the most common themes, strengths, weaknesses, and any notable \
                 patterns. Answer in plain text without titles or emphasis because the result is \
                 shown unformatted:"
            }
        }
    }

    /// Text substituted when the completion API cannot be used.
    #[must_use]
    pub fn unavailable_message(self) -> &'static str {
        match self {
            Self::Brief => "Unable to generate a summary at this time.",
            Self::Detailed => "Unable to generate a detailed analysis at this time.",
        }
    }
}

/// One line per review: `author (rating★): text`.
#[must_use]
pub fn render_reviews(reviews: &[Review]) -> String {
    reviews
        .iter()
        .map(|r| format!("{} ({}★): {}", r.author, r.rating, r.text))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn summary_user_prompt(mode: SummaryMode, reviews: &[Review]) -> String {
    format!("{}\n\n{}", mode.instruction(), render_reviews(reviews))
}

pub(crate) fn compare_system_prompt() -> &'static str {
    COMPARE_SYSTEM_PROMPT
}

pub(crate) fn compare_user_prompt(
    first_name: &str,
    first_reviews: &[Review],
    second_name: &str,
    second_reviews: &[Review],
) -> String {
    let texts = |reviews: &[Review]| {
        reviews
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "{COMPARE_INSTRUCTION}\n\nRestaurant 1 ({first_name}):\n{}\n\nRestaurant 2 ({second_name}):\n{}",
        texts(first_reviews),
        texts(second_reviews),
    )
}

#[cfg(test)]
mod tests {
    use platewise_core::Platform;

    use super::*;

    fn review(author: &str, rating: f64, text: &str) -> Review {
        Review {
            platform: Platform::Google,
            author: author.to_string(),
            text: text.to_string(),
            rating,
        }
    }

    #[test]
    fn render_reviews_formats_one_line_each() {
        let rendered = render_reviews(&[
            review("Ana", 5.0, "Perfect pasta"),
            review("Ben", 3.5, "Slow service"),
        ]);
        assert_eq!(rendered, "Ana (5★): Perfect pasta\nBen (3.5★): Slow service");
    }

    #[test]
    fn summary_prompt_starts_with_mode_instruction() {
        let prompt = summary_user_prompt(SummaryMode::Detailed, &[review("Ana", 4.0, "Good")]);
        assert!(prompt.starts_with(SummaryMode::Detailed.instruction()));
        assert!(prompt.ends_with("Ana (4★): Good"));
    }

    #[test]
    fn compare_prompt_labels_both_restaurants() {
        let prompt = compare_user_prompt(
            "Roma",
            &[review("Ana", 5.0, "Great")],
            "Napoli",
            &[review("Ben", 2.0, "Cold pizza")],
        );
        assert!(prompt.contains("Restaurant 1 (Roma):\nGreat"));
        assert!(prompt.contains("Restaurant 2 (Napoli):\nCold pizza"));
    }

    #[test]
    fn modes_have_distinct_unavailable_messages() {
        assert_ne!(
            SummaryMode::Brief.unavailable_message(),
            SummaryMode::Detailed.unavailable_message()
        );
    }
}
