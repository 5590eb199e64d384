// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use bb_adapters::{FakeNotifier, NotifyCall};
use bb_core::clock::FakeClock;
use serde_json::json;

fn watcher() -> (Arc<JackWatcher<FakeNotifier, FakeClock>>, FakeNotifier, FakeClock) {
    let notifier = FakeNotifier::new();
    let clock = FakeClock::new();
    let watcher = Arc::new(JackWatcher::new(
        Some(Arc::new(notifier.clone())),
        clock.clone(),
    ));
    (watcher, notifier, clock)
}

fn jack(id: &str) -> serde_json::Value {
    json!({"id": id, "type": "jack", "title": format!("help {id}")})
}

fn raised_count(notifier: &FakeNotifier) -> usize {
    notifier
        .calls()
        .iter()
        .filter(|c| matches!(c, NotifyCall::JackRaised(_)))
        .count()
}

#[tokio::test]
async fn created_below_threshold_notifies_individually() {
    let (watcher, notifier, _clock) = watcher();
    for i in 0..3 {
        watcher.on_created(&jack(&format!("bd-{i}"))).await;
    }
    assert_eq!(raised_count(&notifier), 3);
}

#[tokio::test]
async fn burst_of_twelve_notifies_ten_then_batches_two() {
    let (watcher, notifier, _clock) = watcher();
    for i in 0..12 {
        watcher.on_created(&jack(&format!("bd-{i}"))).await;
    }
    assert_eq!(raised_count(&notifier), 10);

    // The window elapses.
    watcher.flush_batch().await;

    let batches: Vec<_> = notifier
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            NotifyCall::JackBatch(ids) => Some(ids),
            _ => None,
        })
        .collect();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0], vec!["bd-10".to_string(), "bd-11".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn armed_window_flushes_once_on_its_own() {
    let (watcher, notifier, _clock) = watcher();
    for i in 0..12 {
        watcher.on_created(&jack(&format!("bd-{i}"))).await;
    }
    assert_eq!(raised_count(&notifier), 10);

    // No manual flush: the timer armed by the 11th event fires when the
    // window elapses. The 12th event must not arm a second timer.
    tokio::time::sleep(BATCH_WINDOW + Duration::from_secs(1)).await;

    let batches: Vec<_> = notifier
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            NotifyCall::JackBatch(ids) => Some(ids),
            _ => None,
        })
        .collect();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0], vec!["bd-10".to_string(), "bd-11".to_string()]);

    // The fired timer reset the window; a later burst notifies directly.
    watcher.on_created(&jack("bd-next")).await;
    assert_eq!(raised_count(&notifier), 11);
}

#[tokio::test]
async fn flush_resets_the_window() {
    let (watcher, notifier, _clock) = watcher();
    for i in 0..11 {
        watcher.on_created(&jack(&format!("bd-{i}"))).await;
    }
    watcher.flush_batch().await;

    // A fresh burst notifies individually again.
    watcher.on_created(&jack("bd-next")).await;
    assert_eq!(raised_count(&notifier), 11);

    // No overflow pending, so a spurious flush sends nothing.
    watcher.flush_batch().await;
    let batch_count = notifier
        .calls()
        .iter()
        .filter(|c| matches!(c, NotifyCall::JackBatch(_)))
        .count();
    assert_eq!(batch_count, 1);
}

#[tokio::test]
async fn flush_at_or_below_threshold_sends_no_batch() {
    let (watcher, notifier, _clock) = watcher();
    for i in 0..10 {
        watcher.on_created(&jack(&format!("bd-{i}"))).await;
    }
    watcher.flush_batch().await;
    assert!(notifier
        .calls()
        .iter()
        .all(|c| matches!(c, NotifyCall::JackRaised(_))));
}

#[tokio::test]
async fn closed_twice_lowers_once() {
    let (watcher, notifier, _clock) = watcher();
    watcher.on_closed(&jack("bd-1")).await;
    watcher.on_closed(&jack("bd-1")).await;

    let lowered: Vec<_> = notifier
        .calls()
        .into_iter()
        .filter(|c| matches!(c, NotifyCall::JackLowered(_)))
        .collect();
    assert_eq!(lowered, vec![NotifyCall::JackLowered("bd-1".to_string())]);
}

#[tokio::test]
async fn update_without_escalation_label_is_ignored() {
    let (watcher, notifier, _clock) = watcher();
    watcher.on_updated(&jack("bd-1")).await;
    assert!(notifier.calls().is_empty());
}

#[tokio::test]
async fn escalated_update_notifies_once_per_window() {
    let (watcher, notifier, clock) = watcher();
    let payload = json!({"id": "bd-1", "type": "jack", "labels": ["Escalated"]});

    watcher.on_updated(&payload).await;
    watcher.on_updated(&payload).await;
    assert_eq!(notifier.calls().len(), 1);

    // Still overdue after the expiry window: notify again.
    clock.advance(EXPIRY_REPEAT_WINDOW + Duration::from_secs(1));
    watcher.on_updated(&payload).await;
    assert_eq!(
        notifier.calls(),
        vec![
            NotifyCall::JackExpired("bd-1".to_string()),
            NotifyCall::JackExpired("bd-1".to_string()),
        ]
    );
}

#[tokio::test]
async fn foreign_kinds_and_malformed_payloads_are_ignored() {
    let (watcher, notifier, _clock) = watcher();
    watcher.on_created(&json!({"id": "bd-1", "type": "issue"})).await;
    watcher.on_created(&json!("garbage")).await;
    watcher.on_closed(&json!({"no": "id"})).await;
    assert!(notifier.calls().is_empty());
}

#[tokio::test]
async fn missing_notifier_is_tolerated() {
    let clock = FakeClock::new();
    let watcher: Arc<JackWatcher<FakeNotifier, FakeClock>> =
        Arc::new(JackWatcher::new(None, clock));
    watcher.on_created(&jack("bd-1")).await;
    watcher.on_closed(&jack("bd-1")).await;
    watcher.flush_batch().await;
}

#[tokio::test]
async fn notifier_failure_does_not_poison_state() {
    let (watcher, notifier, _clock) = watcher();
    notifier.fail_all();
    watcher.on_closed(&jack("bd-1")).await;
    // Lowered dedup already consumed; failure is logged, not retried.
    assert!(notifier.calls().is_empty());
}
