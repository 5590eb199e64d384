//! Jack lifecycle specs
//!
//! Burst batching, lowered dedup, and expiry repeats through the
//! dispatcher.

use crate::prelude::*;
use bb_adapters::NotifyCall;
use bb_engine::jack::EXPIRY_REPEAT_WINDOW;
use bb_engine::topic;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn burst_of_twelve_delivers_ten_then_one_batch() {
    let mut h = Harness::new();
    for i in 0..12 {
        h.publish(topic::BEAD_CREATED, jack_payload(&format!("bd-{i}")))
            .await;
    }

    let raised = h
        .notifier
        .calls()
        .iter()
        .filter(|c| matches!(c, NotifyCall::JackRaised(_)))
        .count();
    assert_eq!(raised, 10);

    h.jack.flush_batch().await;
    let batches: Vec<_> = h
        .notifier
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            NotifyCall::JackBatch(ids) => Some(ids),
            _ => None,
        })
        .collect();
    assert_eq!(batches, vec![vec!["bd-10".to_string(), "bd-11".to_string()]]);
}

#[tokio::test]
async fn closing_the_same_jack_twice_lowers_once() {
    let mut h = Harness::new();
    h.publish(topic::BEAD_CLOSED, jack_payload("bd-1")).await;
    h.publish(topic::BEAD_CLOSED, jack_payload("bd-1")).await;

    let lowered = h
        .notifier
        .calls()
        .iter()
        .filter(|c| matches!(c, NotifyCall::JackLowered(_)))
        .count();
    assert_eq!(lowered, 1);
}

#[tokio::test]
async fn escalated_update_repeats_only_after_the_expiry_window() {
    let mut h = Harness::new();
    let payload = json!({"id": "bd-1", "type": "jack", "labels": ["escalated"]});

    h.publish(topic::BEAD_UPDATED, payload.clone()).await;
    h.publish(topic::BEAD_UPDATED, payload.clone()).await;
    assert_eq!(h.notifier.calls().len(), 1);

    h.clock.advance(EXPIRY_REPEAT_WINDOW + Duration::from_secs(1));
    h.publish(topic::BEAD_UPDATED, payload).await;
    assert_eq!(h.notifier.calls().len(), 2);
}

#[tokio::test]
async fn non_jack_events_do_not_notify() {
    let mut h = Harness::new();
    h.publish(topic::BEAD_CREATED, json!({"id": "bd-1", "type": "task"}))
        .await;
    h.publish(topic::BEAD_CREATED, json!({"malformed": true}))
        .await;
    assert!(h.notifier.calls().is_empty());
}
