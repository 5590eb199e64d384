//! Shared harness for the bridge specs.
//!
//! Wires the dispatcher to the same watcher set the daemon builds, but
//! with the recording fakes and a fake clock. Delivery is pumped
//! synchronously after each publish so assertions never race a task.

use bb_adapters::{FakeNotifier, FakeStore, FakeTracker};
use bb_core::clock::FakeClock;
use bb_core::config::BridgeConfig;
use bb_engine::{topic, Dispatcher, JackWatcher, NudgeWatcher, SyncBackWatcher};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

pub const NUDGE_WINDOW: Duration = Duration::from_secs(5 * 60);

pub struct Harness {
    pub dispatcher: Dispatcher,
    pub notifier: FakeNotifier,
    pub store: FakeStore,
    pub tracker: FakeTracker,
    pub clock: FakeClock,
    pub jack: Arc<JackWatcher<FakeNotifier, FakeClock>>,
    nudge: NudgeWatcher<FakeNotifier, FakeStore, FakeClock>,
    sync: SyncBackWatcher<FakeTracker, FakeClock>,
    created_rx: UnboundedReceiver<Value>,
    updated_rx: UnboundedReceiver<Value>,
    closed_rx: UnboundedReceiver<Value>,
}

impl Harness {
    pub fn new() -> Self {
        let notifier = FakeNotifier::new();
        let store = FakeStore::new();
        let tracker = FakeTracker::new();
        let clock = FakeClock::new();

        let jack = Arc::new(JackWatcher::new(
            Some(Arc::new(notifier.clone())),
            clock.clone(),
        ));
        let nudge = NudgeWatcher::new(
            Arc::new(notifier.clone()),
            Arc::new(store.clone()),
            NUDGE_WINDOW,
            clock.clone(),
        );
        let sync = SyncBackWatcher::new(Arc::new(tracker.clone()), clock.clone(), true);

        let dispatcher = Dispatcher::new();
        let created_rx = dispatcher.subscribe(topic::BEAD_CREATED);
        let updated_rx = dispatcher.subscribe(topic::BEAD_UPDATED);
        let closed_rx = dispatcher.subscribe(topic::BEAD_CLOSED);

        Self {
            dispatcher,
            notifier,
            store,
            tracker,
            clock,
            jack,
            nudge,
            sync,
            created_rx,
            updated_rx,
            closed_rx,
        }
    }

    /// Publish one frame and deliver it to every watcher.
    pub async fn publish(&mut self, topic_name: &str, payload: Value) {
        self.dispatcher.publish(topic_name, payload);
        self.pump().await;
    }

    async fn pump(&mut self) {
        while let Ok(payload) = self.created_rx.try_recv() {
            self.jack.on_created(&payload).await;
        }
        while let Ok(payload) = self.updated_rx.try_recv() {
            self.jack.on_updated(&payload).await;
            self.nudge.on_updated(&payload).await;
            self.sync.on_updated(&payload).await;
        }
        while let Ok(payload) = self.closed_rx.try_recv() {
            self.jack.on_closed(&payload).await;
            self.nudge.on_closed(&payload).await;
            self.sync.on_closed(&payload).await;
        }
    }
}

/// An agent bead whose notes carry a callback destination.
pub fn agent(id: &str, channel: &str) -> bb_core::bead::Bead {
    bb_core::bead::Bead {
        id: id.to_string(),
        kind: "agent".to_string(),
        title: id.to_string(),
        status: "open".to_string(),
        assignee: String::new(),
        labels: Vec::new(),
        fields: std::collections::HashMap::from([(
            "notes".to_string(),
            format!("callback: {channel}"),
        )]),
    }
}

pub fn jack_payload(id: &str) -> Value {
    json!({"id": id, "type": "jack", "title": format!("help {id}")})
}

pub fn task_payload(id: &str, assignee: &str) -> Value {
    json!({"id": id, "type": "task", "title": "work", "assignee": assignee})
}

/// Parse a config literal or panic; specs feed known-good TOML.
pub fn config(raw: &str) -> BridgeConfig {
    BridgeConfig::parse(raw).unwrap()
}
