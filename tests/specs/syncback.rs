//! Sync-back specs
//!
//! Closure mirroring and the review transition against the fake
//! tracker.

use crate::prelude::*;
use bb_adapters::TrackerCall;
use bb_core::adapters::RemoteTransition;
use bb_engine::topic;
use serde_json::json;

#[tokio::test]
async fn closing_a_linked_bead_comments_and_moves_to_review() {
    let mut h = Harness::new();
    h.tracker.set_transitions(vec![RemoteTransition {
        id: "21".to_string(),
        name: "Submit for review".to_string(),
        to_status: "Review".to_string(),
    }]);

    h.publish(
        topic::BEAD_CLOSED,
        json!({
            "id": "bd-1",
            "type": "issue",
            "title": "tracked work",
            "fields": {"tracker_key": "PROJ-1"},
        }),
    )
    .await;

    let calls = h.tracker.calls();
    assert!(calls
        .iter()
        .any(|c| matches!(c, TrackerCall::AddComment { key, .. } if key == "PROJ-1")));
    assert!(calls.iter().any(|c| matches!(
        c,
        TrackerCall::ApplyTransition { key, id } if key == "PROJ-1" && id == "21"
    )));
}

#[tokio::test]
async fn close_without_external_key_touches_no_tracker() {
    let mut h = Harness::new();
    h.publish(
        topic::BEAD_CLOSED,
        json!({"id": "bd-1", "type": "issue", "title": "local only"}),
    )
    .await;
    assert!(h.tracker.calls().is_empty());
}

#[tokio::test]
async fn key_from_label_fallback_is_honored() {
    let mut h = Harness::new();
    h.publish(
        topic::BEAD_CLOSED,
        json!({
            "id": "bd-2",
            "type": "issue",
            "labels": ["tracker:PROJ-9"],
        }),
    )
    .await;
    assert!(h
        .tracker
        .calls()
        .iter()
        .any(|c| matches!(c, TrackerCall::AddComment { key, .. } if key == "PROJ-9")));
}
