// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-lifetime dedup registry.
//!
//! A "seen it?" cache keyed by opaque prefixed strings, conventionally
//! `"<verb>:<entity-id>"`. There is no eviction: the entity space is
//! bounded by business volume, so unbounded growth over a process
//! lifetime is an accepted cost. Lost state is recovered by catch-up
//! against the bead store, not by a replay log.

use std::collections::HashSet;
use std::sync::Mutex;

/// Build the conventional `"<verb>:<entity-id>"` dedup key.
pub fn dedup_key(verb: &str, id: &str) -> String {
    format!("{}:{}", verb, id)
}

/// Set of dedup keys already acted on.
///
/// Two different verbs for the same entity are independent keys by
/// design: `"created:x"` and `"resolved:x"` never interact.
#[derive(Debug, Default)]
pub struct DedupRegistry {
    seen: Mutex<HashSet<String>>,
}

impl DedupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `key` was previously marked, marking it as a side
    /// effect if not. Check-and-set under one lock: of two concurrent
    /// calls with the same key, exactly one observes "not seen".
    pub fn seen(&self, key: &str) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        !seen.insert(key.to_string())
    }

    /// Unconditionally mark a key without reporting prior state.
    pub fn mark(&self, key: &str) {
        let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        seen.insert(key.to_string());
    }

    /// Number of marked keys.
    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "dedup_tests.rs"]
mod tests;
