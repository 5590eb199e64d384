//! Tracker poller specs
//!
//! Import dedup across polls, reconciliation against the store, and
//! the imported bead flowing back out through sync-back.

use crate::prelude::*;
use bb_core::bead::EXTERNAL_KEY_FIELD;
use bb_core::config::PollerConfig;
use bb_core::RemoteIssue;
use bb_adapters::{FakeStore, FakeTracker, TrackerCall};
use bb_engine::{topic, TrackerPoller};
use serde_json::json;
use std::sync::Arc;

fn issue(key: &str) -> RemoteIssue {
    RemoteIssue {
        key: key.to_string(),
        summary: "imported work".to_string(),
        description: json!({
            "content": [
                {"type": "paragraph", "content": [{"type": "text", "text": "body"}]}
            ]
        }),
        status: "To Do".to_string(),
        issue_type: "Bug".to_string(),
        priority: "High".to_string(),
        url: format!("https://tracker.example/browse/{key}"),
        ..RemoteIssue::default()
    }
}

fn poller(store: &FakeStore, tracker: &FakeTracker) -> TrackerPoller<FakeStore, FakeTracker> {
    let config = PollerConfig {
        project: "PROJ".to_string(),
        ..PollerConfig::default()
    };
    TrackerPoller::new(Arc::new(store.clone()), Arc::new(tracker.clone()), config)
}

#[tokio::test]
async fn same_result_set_polled_twice_creates_one_bead() {
    let store = FakeStore::new();
    let tracker = FakeTracker::with_issues(vec![issue("PROJ-1")]);
    let poller = poller(&store, &tracker);

    poller.poll_once().await;
    poller.poll_once().await;

    assert_eq!(tracker.search_count(), 2);
    assert_eq!(store.created().len(), 1);
}

#[tokio::test]
async fn restart_reconciles_instead_of_recreating() {
    let store = FakeStore::new();
    let tracker = FakeTracker::with_issues(vec![issue("PROJ-1")]);

    poller(&store, &tracker).poll_once().await;
    // Fresh poller, empty in-memory map: the store mapping survives.
    poller(&store, &tracker).poll_once().await;

    assert_eq!(store.created().len(), 1);
}

#[tokio::test]
async fn imported_bead_flows_through_sync_back() {
    let mut h = Harness::new();
    let store = h.store.clone();
    let tracker = FakeTracker::with_issues(vec![issue("PROJ-2")]);
    poller(&store, &tracker).poll_once().await;

    // The imported bead later picks up a change link and an update
    // event fires for it; sync-back mirrors the link to the tracker.
    let imported = store.created().remove(0);
    let key = imported.fields.get(EXTERNAL_KEY_FIELD).unwrap().clone();
    assert_eq!(key, "PROJ-2");
    h.publish(
        topic::BEAD_UPDATED,
        json!({
            "id": "bd-1",
            "type": "issue",
            "title": imported.title,
            "fields": {
                EXTERNAL_KEY_FIELD: key,
                "merge_request": "https://git.example/mr/7",
            },
        }),
    )
    .await;

    assert!(h
        .tracker
        .calls()
        .iter()
        .any(|c| matches!(c, TrackerCall::AddRemoteLink { key, .. } if key == "PROJ-2")));
}
