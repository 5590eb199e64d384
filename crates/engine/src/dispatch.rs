// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fan-out from the upstream event stream to watcher handlers.
//!
//! Stand-in for the external dispatcher's subscribe-by-topic contract:
//! subscribers get every payload published under their topic, payloads
//! are delivered as raw JSON, and parsing is each watcher's own
//! responsibility. No ordering or non-overlap guarantees.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

/// Topic names for bead lifecycle events.
pub mod topic {
    pub const BEAD_CREATED: &str = "bead.created";
    pub const BEAD_UPDATED: &str = "bead.updated";
    pub const BEAD_CLOSED: &str = "bead.closed";
}

/// Routes raw payloads to per-topic subscribers.
#[derive(Debug)]
pub struct Dispatcher {
    subscribers: Arc<RwLock<HashMap<String, Vec<mpsc::UnboundedSender<Value>>>>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Subscribe to a topic; every payload published under it is
    /// delivered to the returned receiver.
    pub fn subscribe(&self, topic: &str) -> mpsc::UnboundedReceiver<Value> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subs.entry(topic.to_string()).or_default().push(tx);
        rx
    }

    /// Publish a payload to all subscribers of `topic`. Dropped
    /// receivers are ignored.
    pub fn publish(&self, topic: &str, payload: Value) {
        let subs = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
        if let Some(senders) = subs.get(topic) {
            for tx in senders {
                let _ = tx.send(payload.clone());
            }
        }
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        let subs = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
        subs.get(topic).map_or(0, Vec::len)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Dispatcher {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
