//! MongoDB implementation of [`IssueStore`].
//!
//! The client is configured with short server-selection and connect
//! timeouts so every operation fails fast when the store is down instead
//! of hanging a request handler.

use std::time::Duration;

use async_trait::async_trait;
use campus_core::{Issue, Status, StatusCheck};
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, ReturnDocument};
use mongodb::{Client, Collection, Database};

use crate::store::{IssueStore, StoreError};

/// Collection of issue documents, keyed by the `id` field.
const ISSUES: &str = "issues";
/// Collection of status-check documents.
const STATUS_CHECKS: &str = "status_checks";

/// Fail-fast bound applied to connection establishment and server selection.
const STORE_TIMEOUT: Duration = Duration::from_secs(2);

/// MongoDB-backed document store.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    /// Build a client for the given connection string and database name.
    ///
    /// Does not require the server to be reachable: the driver connects
    /// lazily, and the service must boot into degraded mode when the store
    /// is down.
    pub async fn connect(url: &str, db_name: &str) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(url).await?;
        options.server_selection_timeout = Some(STORE_TIMEOUT);
        options.connect_timeout = Some(STORE_TIMEOUT);

        let client = Client::with_options(options)?;
        let db = client.database(db_name);
        Ok(MongoStore { client, db })
    }

    /// Typed handle to the issues collection. Deserializing into [`Issue`]
    /// drops the native `_id` field, so it never leaves this adapter.
    fn issues(&self) -> Collection<Issue> {
        self.db.collection(ISSUES)
    }

    fn status_checks(&self) -> Collection<StatusCheck> {
        self.db.collection(STATUS_CHECKS)
    }
}

#[async_trait]
impl IssueStore for MongoStore {
    async fn health_check(&self) -> bool {
        match self
            .client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, "Document store unreachable");
                false
            }
        }
    }

    async fn insert_issue(&self, issue: &Issue) -> Result<(), StoreError> {
        self.issues().insert_one(issue).await?;
        Ok(())
    }

    async fn list_issues(&self) -> Result<Vec<Issue>, StoreError> {
        let cursor = self.issues().find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_escalation_candidates(&self) -> Result<Vec<Issue>, StoreError> {
        let filter = doc! {
            "status": Status::Open.as_str(),
            "priority": campus_core::Priority::Medium.as_str(),
        };
        let cursor = self.issues().find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_status(&self, id: &str, status: Status) -> Result<Option<Issue>, StoreError> {
        let updated = self
            .issues()
            .find_one_and_update(
                doc! { "id": id },
                doc! { "$set": { "status": status.as_str() } },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    async fn escalate(&self, id: &str) -> Result<Option<Issue>, StoreError> {
        // The Medium/Open filter is what makes duplicate escalation attempts
        // idempotent across concurrent loop instances.
        let filter = doc! {
            "id": id,
            "status": Status::Open.as_str(),
            "priority": campus_core::Priority::Medium.as_str(),
        };
        let update = doc! { "$set": {
            "priority": campus_core::Priority::High.as_str(),
            "escalated": true,
        } };
        let updated = self
            .issues()
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    async fn delete_issue(&self, id: &str) -> Result<bool, StoreError> {
        let result = self.issues().delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn count_issues(&self, status: Option<Status>) -> Result<u64, StoreError> {
        let filter = match status {
            Some(s) => doc! { "status": s.as_str() },
            None => doc! {},
        };
        Ok(self.issues().count_documents(filter).await?)
    }

    async fn recent_issues(&self, limit: i64) -> Result<Vec<Issue>, StoreError> {
        let cursor = self
            .issues()
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_status_check(&self, check: &StatusCheck) -> Result<(), StoreError> {
        self.status_checks().insert_one(check).await?;
        Ok(())
    }

    async fn list_status_checks(&self) -> Result<Vec<StatusCheck>, StoreError> {
        let cursor = self.status_checks().find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }
}
