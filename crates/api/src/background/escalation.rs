//! Auto-escalation of stale medium-priority issues.
//!
//! A single perpetual background task per process: every scan interval it
//! finds Open/Medium issues older than the staleness threshold and
//! atomically promotes them to High with `escalated = true`. When the
//! store's health check fails, it backs off on a shorter interval without
//! scanning. The loop only exits on cancellation; scan failures are logged
//! and swallowed.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use campus_db::{IssueStore, StoreError};

use crate::config::EscalationConfig;

/// Run the escalation loop until `cancel` is triggered.
///
/// There is no other exit path: per-issue update failures are contained by
/// [`run_cycle`], and cycle-level failures are logged here and the loop
/// re-enters its idle wait.
pub async fn run(store: Arc<dyn IssueStore>, config: EscalationConfig, cancel: CancellationToken) {
    tracing::info!(
        scan_secs = config.scan_interval.as_secs(),
        backoff_secs = config.backoff_interval.as_secs(),
        stale_secs = config.stale_after.as_secs(),
        "Escalation loop started"
    );

    loop {
        let sleep_for = if store.health_check().await {
            match run_cycle(store.as_ref(), config.stale_after).await {
                Ok(escalated) => {
                    if escalated > 0 {
                        tracing::info!(escalated, "Escalation cycle promoted stale issues");
                    } else {
                        tracing::debug!("Escalation cycle found nothing stale");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Escalation cycle failed");
                }
            }
            config.scan_interval
        } else {
            tracing::warn!(
                backoff_secs = config.backoff_interval.as_secs(),
                "Store unreachable, skipping escalation scan"
            );
            config.backoff_interval
        };

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Escalation loop stopping");
                break;
            }
            _ = tokio::time::sleep(sleep_for) => {}
        }
    }
}

/// One scan cycle: evaluate every Open/Medium issue and escalate those
/// strictly older than `stale_after`. Returns how many were promoted.
///
/// Per-issue failures are logged and do not abort the rest of the scan.
/// Public so tests can drive cycles deterministically at compressed
/// timescales.
pub async fn run_cycle(
    store: &dyn IssueStore,
    stale_after: Duration,
) -> Result<usize, StoreError> {
    let candidates = store.find_escalation_candidates().await?;
    let threshold = chrono::Duration::from_std(stale_after).unwrap_or(chrono::Duration::zero());
    let now = Utc::now();

    let mut escalated = 0;
    for issue in candidates {
        let Some(created_at) = issue.created_at_time() else {
            tracing::warn!(issue_id = %issue.id, created_at = %issue.created_at,
                "Skipping issue with unparseable created_at");
            continue;
        };

        if now - created_at <= threshold {
            continue;
        }

        // The store filters on Medium/Open again inside the atomic update,
        // so a concurrent escalation of the same issue is a no-op here.
        match store.escalate(&issue.id).await {
            Ok(Some(updated)) => {
                escalated += 1;
                tracing::info!(
                    issue_id = %updated.id,
                    building = %updated.building,
                    age_secs = (now - created_at).num_seconds(),
                    "Escalated stale issue to High priority"
                );
            }
            Ok(None) => {
                tracing::debug!(issue_id = %issue.id, "Issue already escalated or mutated");
            }
            Err(e) => {
                tracing::error!(issue_id = %issue.id, error = %e, "Escalation update failed");
            }
        }
    }

    Ok(escalated)
}
