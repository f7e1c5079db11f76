//! The document-store seam.
//!
//! Everything above the storage engine (repository, stats aggregator,
//! escalation loop) talks to this trait, so tests can run against
//! [`crate::MemoryStore`] while production uses [`crate::MongoStore`].

use async_trait::async_trait;
use campus_core::{CoreError, Issue, Status, StatusCheck};

/// Errors from a store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store is unreachable.
    #[error("document store unavailable")]
    Unavailable,

    /// The underlying driver reported a failure.
    #[error("document store error: {0}")]
    Backend(#[from] mongodb::error::Error),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable => CoreError::database_unavailable(),
            StoreError::Backend(e) => CoreError::Internal(format!("Database error: {e}")),
        }
    }
}

/// Operations over the `issues` (and `status_checks`) collections.
///
/// Documents are keyed by the application-level `id` field; the store's
/// native identity never crosses this boundary.
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Lightweight reachability probe with a short bounded timeout.
    /// Never errors; false on any failure.
    async fn health_check(&self) -> bool;

    async fn insert_issue(&self, issue: &Issue) -> Result<(), StoreError>;

    /// All issues, unordered.
    async fn list_issues(&self) -> Result<Vec<Issue>, StoreError>;

    /// Issues with `status = Open` and `priority = Medium` -- the set the
    /// escalation loop evaluates.
    async fn find_escalation_candidates(&self) -> Result<Vec<Issue>, StoreError>;

    /// Atomically set the status of the issue with the given id, returning
    /// the updated document, or `None` when no issue matches.
    async fn update_status(&self, id: &str, status: Status) -> Result<Option<Issue>, StoreError>;

    /// Atomically promote a Medium/Open issue to High with `escalated=true`.
    ///
    /// The filter includes `status = Open` and `priority = Medium` so a
    /// concurrent duplicate attempt is an idempotent no-op: once the first
    /// writer commits, the second writer's filter no longer matches and
    /// `None` comes back. Do not weaken this filter.
    async fn escalate(&self, id: &str) -> Result<Option<Issue>, StoreError>;

    /// Delete by id. Returns whether a document was removed.
    async fn delete_issue(&self, id: &str) -> Result<bool, StoreError>;

    /// Count issues, optionally restricted to one status.
    async fn count_issues(&self, status: Option<Status>) -> Result<u64, StoreError>;

    /// The most recently created issues, newest first.
    async fn recent_issues(&self, limit: i64) -> Result<Vec<Issue>, StoreError>;

    async fn insert_status_check(&self, check: &StatusCheck) -> Result<(), StoreError>;

    async fn list_status_checks(&self) -> Result<Vec<StatusCheck>, StoreError>;
}
