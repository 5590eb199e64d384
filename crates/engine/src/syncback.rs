// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sync-back watcher: mirrors bead progress onto tracker issues.
//!
//! Updates carrying a change link attach that link to the mapped issue
//! and leave a comment; closures leave a closing comment and move the
//! issue toward review. Everything here is best effort. A tracker
//! outage loses at most one mirror action, and the windowed dedup keeps
//! event replays from spamming the issue.

use bb_core::bead::{Bead, CHANGE_LINK_FIELD};
use bb_core::clock::Clock;
use bb_core::cooldown::CooldownGate;
use bb_core::Tracker;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Dedup window for repeated mirror actions on one bead.
pub const SYNC_WINDOW: Duration = Duration::from_secs(10 * 60);

/// Target status name for the closure transition.
pub const REVIEW_STATUS: &str = "Review";

/// Watcher pushing bead updates and closures back to the tracker.
pub struct SyncBackWatcher<T: Tracker, C: Clock> {
    tracker: Arc<T>,
    recent: CooldownGate<C>,
    transitions_enabled: bool,
}

impl<T: Tracker, C: Clock> SyncBackWatcher<T, C> {
    pub fn new(tracker: Arc<T>, clock: C, transitions_enabled: bool) -> Self {
        Self {
            tracker,
            recent: CooldownGate::new(SYNC_WINDOW, clock),
            transitions_enabled,
        }
    }

    /// Mirror a change link from an updated bead onto its issue.
    pub async fn on_updated(&self, payload: &Value) {
        let Some(bead) = Bead::from_payload(payload) else {
            return;
        };
        let Some(key) = bead.external_key() else {
            return;
        };
        let Some(link) = bead.field(CHANGE_LINK_FIELD) else {
            return;
        };

        if !self.recent.try_acquire(&format!("link:{}:{}", bead.id, link)) {
            debug!(id = %bead.id, "change link recently mirrored, skipping");
            return;
        }

        let title = format!("{} ({})", bead.title, bead.id);
        if let Err(e) = self.tracker.add_remote_link(key, link, &title).await {
            warn!(key, error = %e, "remote link attach failed");
        }
        let comment = format!("Change in progress for {}: {}", bead.id, link);
        if let Err(e) = self.tracker.add_comment(key, &comment).await {
            warn!(key, error = %e, "progress comment failed");
        }
    }

    /// Mirror a bead closure: closing comment, then transition to review.
    pub async fn on_closed(&self, payload: &Value) {
        let Some(bead) = Bead::from_payload(payload) else {
            return;
        };
        let Some(key) = bead.external_key() else {
            return;
        };

        if !self.recent.try_acquire(&format!("closed:{}", bead.id)) {
            debug!(id = %bead.id, "closure recently mirrored, skipping");
            return;
        }

        let comment = match bead.field(CHANGE_LINK_FIELD) {
            Some(link) => format!("Work item {} closed. Change: {}", bead.id, link),
            None => format!("Work item {} closed.", bead.id),
        };
        if let Err(e) = self.tracker.add_comment(key, &comment).await {
            warn!(key, error = %e, "closing comment failed");
        }

        if self.transitions_enabled {
            self.transition_to_review(key).await;
        } else {
            debug!(key, "transitions disabled, leaving issue status alone");
        }
    }

    /// Find and apply the workflow transition whose name or target
    /// status matches [`REVIEW_STATUS`], case-insensitively.
    async fn transition_to_review(&self, key: &str) {
        let transitions = match self.tracker.transitions(key).await {
            Ok(transitions) => transitions,
            Err(e) => {
                warn!(key, error = %e, "transition listing failed");
                return;
            }
        };

        let Some(transition) = transitions.iter().find(|t| {
            t.name.eq_ignore_ascii_case(REVIEW_STATUS)
                || t.to_status.eq_ignore_ascii_case(REVIEW_STATUS)
        }) else {
            warn!(key, "no review transition available from current status");
            return;
        };

        match self.tracker.apply_transition(key, &transition.id).await {
            Ok(()) => info!(key, transition = %transition.name, "issue moved to review"),
            Err(e) => warn!(key, error = %e, "review transition failed"),
        }
    }
}

#[cfg(test)]
#[path = "syncback_tests.rs"]
mod tests;
