//! In-memory [`IssueStore`] used by unit and integration tests.
//!
//! Mirrors the MongoDB adapter's observable behaviour, including the
//! filter-then-update escalation semantics, and adds an injectable health
//! flag so degraded-mode paths can be exercised deterministically.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use campus_core::{Issue, Priority, Status, StatusCheck};
use tokio::sync::RwLock;

use crate::store::{IssueStore, StoreError};

/// Document store backed by process memory.
#[derive(Default)]
pub struct MemoryStore {
    issues: RwLock<Vec<Issue>>,
    status_checks: RwLock<Vec<StatusCheck>>,
    unhealthy: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle reachability. While unhealthy, `health_check` returns false
    /// and every operation errors, matching a down MongoDB.
    pub fn set_healthy(&self, healthy: bool) {
        self.unhealthy.store(!healthy, Ordering::SeqCst);
    }

    fn guard(&self) -> Result<(), StoreError> {
        if self.unhealthy.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl IssueStore for MemoryStore {
    async fn health_check(&self) -> bool {
        !self.unhealthy.load(Ordering::SeqCst)
    }

    async fn insert_issue(&self, issue: &Issue) -> Result<(), StoreError> {
        self.guard()?;
        self.issues.write().await.push(issue.clone());
        Ok(())
    }

    async fn list_issues(&self) -> Result<Vec<Issue>, StoreError> {
        self.guard()?;
        Ok(self.issues.read().await.clone())
    }

    async fn find_escalation_candidates(&self) -> Result<Vec<Issue>, StoreError> {
        self.guard()?;
        Ok(self
            .issues
            .read()
            .await
            .iter()
            .filter(|i| i.status == Status::Open && i.priority == Priority::Medium)
            .cloned()
            .collect())
    }

    async fn update_status(&self, id: &str, status: Status) -> Result<Option<Issue>, StoreError> {
        self.guard()?;
        let mut issues = self.issues.write().await;
        Ok(issues.iter_mut().find(|i| i.id == id).map(|issue| {
            issue.status = status;
            issue.clone()
        }))
    }

    async fn escalate(&self, id: &str) -> Result<Option<Issue>, StoreError> {
        self.guard()?;
        let mut issues = self.issues.write().await;
        Ok(issues
            .iter_mut()
            .find(|i| i.id == id && i.status == Status::Open && i.priority == Priority::Medium)
            .map(|issue| {
                issue.priority = Priority::High;
                issue.escalated = true;
                issue.clone()
            }))
    }

    async fn delete_issue(&self, id: &str) -> Result<bool, StoreError> {
        self.guard()?;
        let mut issues = self.issues.write().await;
        let before = issues.len();
        issues.retain(|i| i.id != id);
        Ok(issues.len() < before)
    }

    async fn count_issues(&self, status: Option<Status>) -> Result<u64, StoreError> {
        self.guard()?;
        let issues = self.issues.read().await;
        let count = match status {
            Some(s) => issues.iter().filter(|i| i.status == s).count(),
            None => issues.len(),
        };
        Ok(count as u64)
    }

    async fn recent_issues(&self, limit: i64) -> Result<Vec<Issue>, StoreError> {
        self.guard()?;
        let mut issues = self.issues.read().await.clone();
        // RFC 3339 UTC strings at fixed precision sort lexicographically.
        issues.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        issues.truncate(limit.max(0) as usize);
        Ok(issues)
    }

    async fn insert_status_check(&self, check: &StatusCheck) -> Result<(), StoreError> {
        self.guard()?;
        self.status_checks.write().await.push(check.clone());
        Ok(())
    }

    async fn list_status_checks(&self) -> Result<Vec<StatusCheck>, StoreError> {
        self.guard()?;
        Ok(self.status_checks.read().await.clone())
    }
}
