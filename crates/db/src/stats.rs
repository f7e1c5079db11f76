//! Read-only rollup over the issue collection.
//!
//! This path never errors: when the store is unreachable (or any count
//! fails) it degrades to a zeroed snapshot so dashboards stay responsive.

use campus_core::{Issue, Status};
use serde::Serialize;

use crate::store::{IssueStore, StoreError};

/// How many recent issues the snapshot includes.
const RECENT_LIMIT: i64 = 5;

/// Aggregate counts plus the most recent issues.
#[derive(Debug, Serialize)]
pub struct StatsSnapshot {
    pub total_issues: u64,
    pub open_issues: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub system_status: &'static str,
    pub recent_logs: Vec<Issue>,
}

impl StatsSnapshot {
    /// The zeroed snapshot returned while the store is unreachable.
    pub fn degraded() -> Self {
        StatsSnapshot {
            total_issues: 0,
            open_issues: 0,
            in_progress: 0,
            resolved: 0,
            system_status: "Degraded",
            recent_logs: Vec::new(),
        }
    }
}

/// Collect the current snapshot. Infallible by contract.
pub async fn collect(store: &dyn IssueStore) -> StatsSnapshot {
    if !store.health_check().await {
        return StatsSnapshot::degraded();
    }

    match gather(store).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!(error = %e, "Stats collection failed, degrading");
            StatsSnapshot::degraded()
        }
    }
}

async fn gather(store: &dyn IssueStore) -> Result<StatsSnapshot, StoreError> {
    Ok(StatsSnapshot {
        total_issues: store.count_issues(None).await?,
        open_issues: store.count_issues(Some(Status::Open)).await?,
        in_progress: store.count_issues(Some(Status::InProgress)).await?,
        resolved: store.count_issues(Some(Status::Resolved)).await?,
        system_status: "Operational",
        recent_logs: store.recent_issues(RECENT_LIMIT).await?,
    })
}
