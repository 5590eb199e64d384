//! Claimed-work nudge specs
//!
//! Cooldown behavior for update/close nudges delivered to the
//! assignee's callback channel.

use crate::prelude::*;
use bb_adapters::NotifyCall;
use bb_engine::topic;
use std::time::Duration;

#[tokio::test]
async fn repeated_updates_nudge_once_per_window() {
    let mut h = Harness::new();
    h.store.insert(agent("agent-max", "#max"));

    h.publish(topic::BEAD_UPDATED, task_payload("bd-1", "agent-max"))
        .await;
    h.publish(topic::BEAD_UPDATED, task_payload("bd-1", "agent-max"))
        .await;

    assert_eq!(
        h.notifier.calls(),
        vec![NotifyCall::ClaimedUpdated {
            id: "bd-1".to_string(),
            destination: "#max".to_string(),
        }]
    );
}

#[tokio::test]
async fn a_different_bead_nudges_independently() {
    let mut h = Harness::new();
    h.store.insert(agent("agent-max", "#max"));

    h.publish(topic::BEAD_UPDATED, task_payload("bd-1", "agent-max"))
        .await;
    h.publish(topic::BEAD_UPDATED, task_payload("bd-2", "agent-max"))
        .await;
    assert_eq!(h.notifier.calls().len(), 2);
}

#[tokio::test]
async fn closure_nudges_again_after_the_window() {
    let mut h = Harness::new();
    h.store.insert(agent("agent-max", "#max"));

    h.publish(topic::BEAD_UPDATED, task_payload("bd-1", "agent-max"))
        .await;
    // Within the window the closure shares the update's cooldown slot.
    h.publish(topic::BEAD_CLOSED, task_payload("bd-1", "agent-max"))
        .await;
    assert_eq!(h.notifier.calls().len(), 1);

    h.clock.advance(NUDGE_WINDOW + Duration::from_secs(1));
    h.publish(topic::BEAD_CLOSED, task_payload("bd-1", "agent-max"))
        .await;
    assert!(matches!(
        h.notifier.calls().last(),
        Some(NotifyCall::ClaimedClosed { .. })
    ));
}

#[tokio::test]
async fn unknown_assignee_produces_no_nudge() {
    let mut h = Harness::new();
    h.publish(topic::BEAD_UPDATED, task_payload("bd-1", "agent-ghost"))
        .await;
    assert!(h.notifier.calls().is_empty());
}
