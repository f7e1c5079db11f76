//! Classifier output contract and defensive response parsing.
//!
//! The external model is asked for raw JSON matching a fixed schema. This
//! module validates that contract as a pure function so the behaviour is
//! fully unit-testable without network access.

use async_trait::async_trait;
use serde::Deserialize;

use crate::issue::{Category, Priority};

/// Result of classifying an issue description (and optional image).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub priority: Priority,
    pub is_spam: bool,
    pub spam_reason: Option<String>,
}

impl Default for Classification {
    /// The safe fallback used whenever classification is unavailable or
    /// the response is malformed in any way.
    fn default() -> Self {
        Classification {
            category: Category::Other,
            priority: Priority::Medium,
            is_spam: false,
            spam_reason: None,
        }
    }
}

/// Raw wire shape of the classifier's JSON reply. Field types are strict:
/// a non-boolean `is_spam` fails deserialization, which discards the whole
/// response.
#[derive(Debug, Deserialize)]
struct RawClassification {
    category: String,
    priority: String,
    is_spam: Option<bool>,
    spam_reason: Option<String>,
}

impl Classification {
    /// Parse a model response into a [`Classification`].
    ///
    /// Strips an optional Markdown code fence, then requires valid JSON
    /// with `category` and `priority` drawn from the closed enumerations.
    /// Any anomaly -- parse failure, unknown enum value, wrong field type --
    /// resets the ENTIRE result to [`Classification::default`]; a malformed
    /// response is never partially applied.
    pub fn parse_response(text: &str) -> Classification {
        let body = strip_code_fence(text.trim());

        let raw: RawClassification = match serde_json::from_str(body) {
            Ok(raw) => raw,
            Err(_) => return Classification::default(),
        };

        let Ok(category) = raw.category.parse::<Category>() else {
            return Classification::default();
        };
        let Ok(priority) = raw.priority.parse::<Priority>() else {
            return Classification::default();
        };

        let is_spam = raw.is_spam.unwrap_or(false);
        Classification {
            category,
            priority,
            is_spam,
            spam_reason: if is_spam { raw.spam_reason } else { None },
        }
    }
}

/// Remove a wrapping ``` fence (with or without a language tag) if present.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the fence line itself (e.g. "```json"), then the closing fence.
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    match body.rsplit_once("```") {
        Some((body, _)) => body.trim(),
        None => body.trim(),
    }
}

/// Seam for the external classifier.
///
/// Infallible by contract: implementations resolve every failure mode to
/// [`Classification::default`] internally and only log it.
#[async_trait]
pub trait Classify: Send + Sync {
    /// Classify a free-text description with an optional base64 image.
    async fn classify(&self, description: &str, image_base64: Option<&str>) -> Classification;
}
