//! The issue entity, its closed enumerations, and request DTOs.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::classification::Classification;

/// Placeholder identity until a real auth model exists.
pub const PLACEHOLDER_USER_EMAIL: &str = "user@campus.edu";

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Issue category assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Electrical,
    Plumbing,
    Safety,
    Maintenance,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electrical => "Electrical",
            Category::Plumbing => "Plumbing",
            Category::Safety => "Safety",
            Category::Maintenance => "Maintenance",
            Category::Other => "Other",
        }
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Electrical" => Ok(Category::Electrical),
            "Plumbing" => Ok(Category::Plumbing),
            "Safety" => Ok(Category::Safety),
            "Maintenance" => Ok(Category::Maintenance),
            "Other" => Ok(Category::Other),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue priority assigned by the classifier (and raised by escalation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }
}

impl FromStr for Priority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Priority::Low),
            "Medium" => Ok(Priority::Medium),
            "High" => Ok(Priority::High),
            "Critical" => Ok(Priority::Critical),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow status of an issue.
///
/// Only three values occur in practice, so this is a closed enumeration.
/// `In Progress` serializes with the space to match the persisted documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A single reported campus maintenance problem.
///
/// Persisted as one document in the `issues` collection, keyed by `id`
/// (not by the store's native `_id`, which never leaves the adapter).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Opaque unique identifier, generated at creation, immutable.
    pub id: String,
    pub building: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    #[serde(default)]
    pub is_spam: bool,
    /// Only meaningful when `is_spam` is true; otherwise absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spam_reason: Option<String>,
    /// True only when the escalation loop raised the priority to High.
    #[serde(default)]
    pub escalated: bool,
    /// RFC 3339 UTC timestamp, fixed precision so it sorts lexicographically.
    /// Set once at creation, never modified.
    pub created_at: String,
    pub user_email: String,
}

impl Issue {
    /// Build a new issue from a submission and its (possibly defaulted)
    /// classification. Generates the id and creation timestamp and applies
    /// the `spam_reason`-requires-`is_spam` invariant.
    pub fn new(input: &CreateIssue, classification: Classification) -> Self {
        let spam_reason = if classification.is_spam {
            classification.spam_reason
        } else {
            None
        };

        Issue {
            id: uuid::Uuid::new_v4().to_string(),
            building: input.building.clone(),
            description: input.description.clone(),
            image_url: input.image_url.clone(),
            category: classification.category,
            priority: classification.priority,
            status: Status::Open,
            is_spam: classification.is_spam,
            spam_reason,
            escalated: false,
            created_at: now_rfc3339(),
            user_email: PLACEHOLDER_USER_EMAIL.to_string(),
        }
    }

    /// Parse the creation timestamp back into a `DateTime<Utc>`.
    ///
    /// Returns `None` for documents with an unparseable timestamp; callers
    /// (notably the escalation loop) skip those rather than failing.
    pub fn created_at_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Current time as a fixed-width RFC 3339 UTC string.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// DTO for submitting a new issue.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIssue {
    pub building: String,
    pub description: String,
    /// Inline photo payload, forwarded to the classifier only.
    pub image_base64: Option<String>,
    /// Reference to an already-hosted photo, persisted as-is.
    pub image_url: Option<String>,
}

/// DTO for updating an issue's workflow status.
#[derive(Debug, Deserialize)]
pub struct UpdateIssueStatus {
    pub status: Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> CreateIssue {
        CreateIssue {
            building: "Library".to_string(),
            description: "Ceiling leak".to_string(),
            image_base64: None,
            image_url: None,
        }
    }

    #[test]
    fn new_issue_has_safe_defaults_and_open_status() {
        let issue = Issue::new(&input(), Classification::default());

        assert_eq!(issue.category, Category::Other);
        assert_eq!(issue.priority, Priority::Medium);
        assert_eq!(issue.status, Status::Open);
        assert!(!issue.is_spam);
        assert!(issue.spam_reason.is_none());
        assert!(!issue.escalated);
        assert_eq!(issue.user_email, PLACEHOLDER_USER_EMAIL);
        assert!(issue.created_at_time().is_some());
    }

    #[test]
    fn spam_reason_is_dropped_when_not_spam() {
        // A misbehaving classifier impl could hand back a reason without the
        // flag; the constructor enforces the invariant.
        let classification = Classification {
            is_spam: false,
            spam_reason: Some("looks fake".to_string()),
            ..Classification::default()
        };
        let issue = Issue::new(&input(), classification);
        assert!(issue.spam_reason.is_none());
    }

    #[test]
    fn spam_reason_is_kept_when_spam() {
        let classification = Classification {
            is_spam: true,
            spam_reason: Some("gibberish".to_string()),
            ..Classification::default()
        };
        let issue = Issue::new(&input(), classification);
        assert!(issue.is_spam);
        assert_eq!(issue.spam_reason.as_deref(), Some("gibberish"));
    }

    #[test]
    fn status_serializes_with_space() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let back: Status = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(back, Status::InProgress);
    }

    #[test]
    fn unknown_status_string_is_rejected() {
        assert!(serde_json::from_str::<Status>("\"Closed\"").is_err());
    }

    #[test]
    fn created_at_strings_sort_chronologically() {
        let a = now_rfc3339();
        let b = now_rfc3339();
        assert!(a <= b);
    }
}
