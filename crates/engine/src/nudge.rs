// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rate-limited nudges for claimed beads.
//!
//! Update and close events for beads with an assignee produce a nudge
//! to the assignee's callback channel, at most one per bead within the
//! cooldown window. Identity/config/communication/aggregate/report
//! kinds are excluded; agents get nudged about work, not about
//! bookkeeping beads.

use bb_core::bead::Bead;
use bb_core::clock::Clock;
use bb_core::cooldown::CooldownGate;
use bb_core::{BeadStore, Notifier};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Bead kinds that never produce nudges.
pub const EXCLUDED_KINDS: &[&str] = &["agent", "role", "rig", "convo", "epic", "digest"];

/// Free-text field on an agent bead holding its callback destination.
pub const NOTES_FIELD: &str = "notes";

/// Line prefix inside the notes field marking the callback destination.
pub const CALLBACK_PREFIX: &str = "callback:";

#[derive(Debug, Clone, Copy)]
enum NudgeKind {
    Updated,
    Closed,
}

/// Watcher nudging assignees about activity on their claimed beads.
pub struct NudgeWatcher<N: Notifier, S: BeadStore, C: Clock> {
    notifier: Arc<N>,
    store: Arc<S>,
    cooldown: CooldownGate<C>,
}

/// Extract the callback destination from an agent bead's notes.
pub fn callback_destination(agent: &Bead) -> Option<String> {
    agent
        .field(NOTES_FIELD)?
        .lines()
        .find_map(|line| line.trim().strip_prefix(CALLBACK_PREFIX))
        .map(|rest| rest.trim().to_string())
        .filter(|dest| !dest.is_empty())
}

impl<N: Notifier, S: BeadStore, C: Clock> NudgeWatcher<N, S, C> {
    pub fn new(notifier: Arc<N>, store: Arc<S>, window: Duration, clock: C) -> Self {
        Self {
            notifier,
            store,
            cooldown: CooldownGate::new(window, clock),
        }
    }

    pub async fn on_updated(&self, payload: &Value) {
        self.handle(payload, NudgeKind::Updated).await;
    }

    pub async fn on_closed(&self, payload: &Value) {
        self.handle(payload, NudgeKind::Closed).await;
    }

    async fn handle(&self, payload: &Value, kind: NudgeKind) {
        let Some(bead) = Bead::from_payload(payload) else {
            debug!("undecodable payload, skipping nudge");
            return;
        };
        let Some(assignee) = bead.assignee() else {
            return;
        };
        if EXCLUDED_KINDS.contains(&bead.kind.as_str()) {
            return;
        }

        // One slot per bead id shared by both nudge kinds: an update
        // nudge suppresses a closure nudge for the same bead within the
        // window (kept as-is from the source behavior).
        if !self.cooldown.try_acquire(&bead.id) {
            debug!(id = %bead.id, "nudge cooldown active");
            return;
        }

        let agent = match self.store.get(assignee).await {
            Ok(agent) => agent,
            Err(e) => {
                warn!(assignee, error = %e, "assignee lookup failed, abandoning nudge");
                return;
            }
        };
        let Some(destination) = callback_destination(&agent) else {
            warn!(assignee, "no callback destination in assignee notes, abandoning nudge");
            return;
        };

        let result = match kind {
            NudgeKind::Updated => self.notifier.claimed_updated(&bead, &destination).await,
            NudgeKind::Closed => self.notifier.claimed_closed(&bead, &destination).await,
        };
        if let Err(e) = result {
            warn!(id = %bead.id, destination, error = %e, "nudge delivery failed");
        }
    }
}

#[cfg(test)]
#[path = "nudge_tests.rs"]
mod tests;
