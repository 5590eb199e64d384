// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sliding-window cooldown gate.
//!
//! Gates repeated actions per key: at most one acquisition per key
//! within the configured window. Entries older than the window are
//! evicted lazily on the next check, so the map stays proportional to
//! recent activity.

use crate::clock::Clock;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Per-key cooldown window gate.
#[derive(Debug)]
pub struct CooldownGate<C: Clock> {
    window: Duration,
    clock: C,
    entries: Mutex<HashMap<String, Instant>>,
}

impl<C: Clock> CooldownGate<C> {
    pub fn new(window: Duration, clock: C) -> Self {
        Self {
            window,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Try to take the cooldown slot for `key`. Returns true (and
    /// records the acquisition) if no acquisition for `key` is still
    /// within the window; false if the key is cooling down.
    ///
    /// Stale entries are evicted as a side effect of every call.
    pub fn try_acquire(&self, key: &str) -> bool {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, at| now.duration_since(*at) < self.window);

        if entries.contains_key(key) {
            return false;
        }
        entries.insert(key.to_string(), now);
        true
    }

    /// Number of live (non-evicted) entries.
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, at| now.duration_since(*at) < self.window);
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "cooldown_tests.rs"]
mod tests;
