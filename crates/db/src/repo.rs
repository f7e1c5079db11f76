//! CRUD operations over the issue entity.
//!
//! Composes the store seam and (for creation) the classifier seam, and is
//! the single place the document shape and its invariants are enforced.

use std::sync::Arc;

use campus_core::{
    Classification, Classify, CoreError, CreateIssue, CreateStatusCheck, Issue, Status,
    StatusCheck,
};

use crate::store::IssueStore;

/// Repository over the `issues` collection.
///
/// Cheaply cloneable; handlers and the binary share one instance via
/// application state.
#[derive(Clone)]
pub struct IssueRepository {
    store: Arc<dyn IssueStore>,
    classifier: Option<Arc<dyn Classify>>,
}

impl IssueRepository {
    pub fn new(store: Arc<dyn IssueStore>, classifier: Option<Arc<dyn Classify>>) -> Self {
        IssueRepository { store, classifier }
    }

    /// The underlying store (used by the stats aggregator and health check).
    pub fn store(&self) -> &Arc<dyn IssueStore> {
        &self.store
    }

    /// Fail fast with a typed "Database unavailable" condition instead of
    /// letting an operation hang or surface a driver error.
    async fn guard(&self) -> Result<(), CoreError> {
        if self.store.health_check().await {
            Ok(())
        } else {
            Err(CoreError::database_unavailable())
        }
    }

    /// Create an issue: reachability guard, best-effort classification,
    /// id/timestamp generation, persist.
    ///
    /// The guard runs BEFORE classification so an unreachable store fails
    /// fast rather than wasting a classifier round-trip. Classification
    /// failures never block creation; they resolve to safe defaults inside
    /// the classifier.
    pub async fn create(&self, input: CreateIssue) -> Result<Issue, CoreError> {
        self.guard().await?;

        let classification = match &self.classifier {
            Some(classifier) => {
                classifier
                    .classify(&input.description, input.image_base64.as_deref())
                    .await
            }
            None => Classification::default(),
        };

        let issue = Issue::new(&input, classification);
        self.store.insert_issue(&issue).await?;

        tracing::info!(
            issue_id = %issue.id,
            building = %issue.building,
            category = %issue.category,
            priority = %issue.priority,
            "Issue created"
        );
        Ok(issue)
    }

    /// All issues, without internal storage identifiers.
    pub async fn list(&self) -> Result<Vec<Issue>, CoreError> {
        self.guard().await?;
        Ok(self.store.list_issues().await?)
    }

    /// Atomic status update keyed by `id`.
    pub async fn update_status(&self, id: &str, status: Status) -> Result<Issue, CoreError> {
        self.guard().await?;
        let updated = self.store.update_status(id, status).await?;
        match updated {
            Some(issue) => {
                tracing::info!(issue_id = %id, status = %issue.status, "Issue status updated");
                Ok(issue)
            }
            None => Err(CoreError::NotFound {
                entity: "Issue",
                id: id.to_string(),
            }),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<(), CoreError> {
        self.guard().await?;
        if self.store.delete_issue(id).await? {
            tracing::info!(issue_id = %id, "Issue deleted");
            Ok(())
        } else {
            Err(CoreError::NotFound {
                entity: "Issue",
                id: id.to_string(),
            })
        }
    }

    pub async fn record_status_check(
        &self,
        input: CreateStatusCheck,
    ) -> Result<StatusCheck, CoreError> {
        self.guard().await?;
        let check = StatusCheck::new(input.client_name);
        self.store.insert_status_check(&check).await?;
        Ok(check)
    }

    pub async fn status_checks(&self) -> Result<Vec<StatusCheck>, CoreError> {
        self.guard().await?;
        Ok(self.store.list_status_checks().await?)
    }
}
