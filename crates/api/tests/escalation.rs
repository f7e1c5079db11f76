//! Tests for the auto-escalation background loop.
//!
//! `run_cycle` is driven directly for deterministic boundary checks; the
//! full loop is exercised at compressed timescales via the injectable
//! `EscalationConfig`.

use std::sync::Arc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use tokio_util::sync::CancellationToken;

use campus_api::background::escalation;
use campus_api::config::EscalationConfig;
use campus_core::{Classification, CreateIssue, Issue, Priority, Status};
use campus_db::{IssueStore, MemoryStore};

const TEN_MINUTES: Duration = Duration::from_secs(600);

/// Build an Open/Medium issue whose creation time lies `age_secs` in the
/// past.
fn aged_issue(building: &str, age_secs: i64) -> Issue {
    let mut issue = Issue::new(
        &CreateIssue {
            building: building.to_string(),
            description: "flickering lights".to_string(),
            image_base64: None,
            image_url: None,
        },
        Classification::default(),
    );
    issue.created_at = (Utc::now() - chrono::Duration::seconds(age_secs))
        .to_rfc3339_opts(SecondsFormat::Micros, true);
    issue
}

// ---------------------------------------------------------------------------
// Test: the 10-minute boundary is strict
// ---------------------------------------------------------------------------

#[tokio::test]
async fn issue_just_under_threshold_is_not_escalated() {
    let store = MemoryStore::new();
    let issue = aged_issue("Library", 599); // 9m59s
    store.insert_issue(&issue).await.unwrap();

    let escalated = escalation::run_cycle(&store, TEN_MINUTES).await.unwrap();
    assert_eq!(escalated, 0);

    let listed = store.list_issues().await.unwrap();
    assert_eq!(listed[0].priority, Priority::Medium);
    assert!(!listed[0].escalated);
}

#[tokio::test]
async fn issue_just_over_threshold_is_escalated() {
    let store = MemoryStore::new();
    let issue = aged_issue("Library", 601); // 10m01s
    store.insert_issue(&issue).await.unwrap();

    let escalated = escalation::run_cycle(&store, TEN_MINUTES).await.unwrap();
    assert_eq!(escalated, 1);

    let listed = store.list_issues().await.unwrap();
    assert_eq!(listed[0].priority, Priority::High);
    assert_eq!(listed[0].status, Status::Open);
    assert!(listed[0].escalated);
}

// ---------------------------------------------------------------------------
// Test: running the cycle twice applies exactly one transition
// ---------------------------------------------------------------------------

#[tokio::test]
async fn double_cycle_escalates_exactly_once() {
    let store = MemoryStore::new();
    store.insert_issue(&aged_issue("Gym", 1200)).await.unwrap();

    let first = escalation::run_cycle(&store, TEN_MINUTES).await.unwrap();
    let second = escalation::run_cycle(&store, TEN_MINUTES).await.unwrap();
    assert_eq!(first, 1);
    assert_eq!(second, 0);

    let listed = store.list_issues().await.unwrap();
    assert_eq!(listed[0].priority, Priority::High);
    assert!(listed[0].escalated);
}

// ---------------------------------------------------------------------------
// Test: only Open/Medium issues are considered
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cycle_ignores_non_candidates() {
    let store = MemoryStore::new();

    let mut high = aged_issue("A", 1200);
    high.priority = Priority::High;
    store.insert_issue(&high).await.unwrap();

    let resolved = aged_issue("B", 1200);
    store.insert_issue(&resolved).await.unwrap();
    store
        .update_status(&resolved.id, Status::Resolved)
        .await
        .unwrap();

    let escalated = escalation::run_cycle(&store, TEN_MINUTES).await.unwrap();
    assert_eq!(escalated, 0);
}

// ---------------------------------------------------------------------------
// Test: an unparseable created_at is skipped, not fatal for the scan
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unparseable_timestamp_does_not_abort_the_scan() {
    let store = MemoryStore::new();

    let mut corrupt = aged_issue("C", 1200);
    corrupt.created_at = "not-a-timestamp".to_string();
    store.insert_issue(&corrupt).await.unwrap();

    let stale = aged_issue("D", 1200);
    store.insert_issue(&stale).await.unwrap();

    let escalated = escalation::run_cycle(&store, TEN_MINUTES).await.unwrap();
    assert_eq!(escalated, 1);

    let listed = store.list_issues().await.unwrap();
    let promoted = listed.iter().find(|i| i.id == stale.id).unwrap();
    assert!(promoted.escalated);
    let skipped = listed.iter().find(|i| i.id == corrupt.id).unwrap();
    assert!(!skipped.escalated);
}

// ---------------------------------------------------------------------------
// Test: the full loop escalates at compressed timescales and stops on cancel
// ---------------------------------------------------------------------------

#[tokio::test]
async fn loop_escalates_and_stops_on_cancellation() {
    let store = Arc::new(MemoryStore::new());
    store.insert_issue(&aged_issue("E", 10)).await.unwrap();

    let config = EscalationConfig {
        scan_interval: Duration::from_millis(10),
        backoff_interval: Duration::from_millis(5),
        stale_after: Duration::from_secs(5),
    };
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(escalation::run(
        Arc::clone(&store) as Arc<dyn IssueStore>,
        config,
        cancel.clone(),
    ));

    // Give the loop a few cycles.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let listed = store.list_issues().await.unwrap();
    assert_eq!(listed[0].priority, Priority::High);
    assert!(listed[0].escalated);

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("loop must stop promptly after cancellation")
        .unwrap();
}

// ---------------------------------------------------------------------------
// Test: while the store is down the loop backs off instead of scanning,
// then recovers once health returns
// ---------------------------------------------------------------------------

#[tokio::test]
async fn loop_backs_off_while_store_is_down_and_recovers() {
    let store = Arc::new(MemoryStore::new());
    store.insert_issue(&aged_issue("F", 10)).await.unwrap();
    store.set_healthy(false);

    let config = EscalationConfig {
        scan_interval: Duration::from_millis(10),
        backoff_interval: Duration::from_millis(5),
        stale_after: Duration::from_secs(5),
    };
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(escalation::run(
        Arc::clone(&store) as Arc<dyn IssueStore>,
        config,
        cancel.clone(),
    ));

    // Let the loop spin against the unhealthy store, then stop it before
    // inspecting state (reads fail while unhealthy).
    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("loop must stop promptly after cancellation")
        .unwrap();

    store.set_healthy(true);
    let listed = store.list_issues().await.unwrap();
    assert!(
        !listed[0].escalated,
        "no escalation may happen while the store is down"
    );

    // Health restored: a fresh loop escalates on its first cycle.
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(escalation::run(
        Arc::clone(&store) as Arc<dyn IssueStore>,
        EscalationConfig {
            scan_interval: Duration::from_millis(10),
            backoff_interval: Duration::from_millis(5),
            stale_after: Duration::from_secs(5),
        },
        cancel.clone(),
    ));
    tokio::time::sleep(Duration::from_millis(100)).await;

    let listed = store.list_issues().await.unwrap();
    assert!(listed[0].escalated);

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("loop must stop promptly after cancellation")
        .unwrap();
}
