// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jack lifecycle watcher: raise / lower / expire, with burst batching.
//!
//! A "jack" is a raised help flag. Created events are notified
//! individually up to [`BATCH_THRESHOLD`] per window; the event that
//! pushes a burst strictly past the threshold arms a one-shot flush
//! timer, and everything beyond the threshold is delivered as a single
//! summary when the window elapses. Closed events produce exactly one
//! "lowered" notification per jack, ever. Updated events only matter
//! when they carry the escalation label, and may repeat per jack after
//! [`EXPIRY_REPEAT_WINDOW`].

use bb_core::bead::Bead;
use bb_core::clock::Clock;
use bb_core::cooldown::CooldownGate;
use bb_core::dedup::{dedup_key, DedupRegistry};
use bb_core::Notifier;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

/// Bead kind this watcher acts on.
pub const JACK_KIND: &str = "jack";

/// Number of created events per window delivered individually.
pub const BATCH_THRESHOLD: usize = 10;

/// Delay before a deferred overflow flush.
pub const BATCH_WINDOW: Duration = Duration::from_secs(60);

/// Minimum gap between repeated expiry notifications for one jack.
pub const EXPIRY_REPEAT_WINDOW: Duration = Duration::from_secs(6 * 60 * 60);

#[derive(Debug, Default)]
struct BatchState {
    /// Created events in the current window, arrival order.
    events: Vec<Bead>,
    /// A flush timer is running for this window.
    armed: bool,
}

enum CreatedAction {
    NotifyNow,
    ArmTimer,
    Defer,
}

/// Watcher over jack created/updated/closed events.
pub struct JackWatcher<N: Notifier, C: Clock> {
    notifier: Option<Arc<N>>,
    batch: Mutex<BatchState>,
    lowered: DedupRegistry,
    expiry: CooldownGate<C>,
}

impl<N: Notifier, C: Clock> JackWatcher<N, C> {
    pub fn new(notifier: Option<Arc<N>>, clock: C) -> Self {
        Self {
            notifier,
            batch: Mutex::new(BatchState::default()),
            lowered: DedupRegistry::new(),
            expiry: CooldownGate::new(EXPIRY_REPEAT_WINDOW, clock),
        }
    }

    fn decode(payload: &Value) -> Option<Bead> {
        let bead = Bead::from_payload(payload)?;
        if bead.kind != JACK_KIND {
            return None;
        }
        Some(bead)
    }

    /// Handle a created event: notify individually up to the batch
    /// threshold, defer the rest for a windowed summary.
    pub async fn on_created(self: &Arc<Self>, payload: &Value) {
        let Some(bead) = Self::decode(payload) else {
            return;
        };

        let action = {
            let mut batch = self.batch.lock().unwrap_or_else(|e| e.into_inner());
            batch.events.push(bead.clone());
            if batch.events.len() <= BATCH_THRESHOLD {
                CreatedAction::NotifyNow
            } else if !batch.armed {
                batch.armed = true;
                CreatedAction::ArmTimer
            } else {
                CreatedAction::Defer
            }
        };

        match action {
            CreatedAction::NotifyNow => {
                if let Some(notifier) = &self.notifier {
                    if let Err(e) = notifier.jack_raised(&bead).await {
                        warn!(id = %bead.id, error = %e, "jack raised notification failed");
                    }
                } else {
                    debug!(id = %bead.id, "no notifier, skipping jack raised");
                }
            }
            CreatedAction::ArmTimer => {
                debug!(id = %bead.id, "batch threshold exceeded, arming flush timer");
                let watcher = Arc::clone(self);
                tokio::spawn(async move {
                    tokio::time::sleep(BATCH_WINDOW).await;
                    watcher.flush_batch().await;
                });
            }
            CreatedAction::Defer => {}
        }
    }

    /// Deliver the current window's overflow as one summary and reset
    /// the window. The batch is swapped out under the lock before any
    /// outbound call, so new arrivals start a fresh window and never
    /// race the flush.
    pub async fn flush_batch(&self) {
        let overflow: Vec<Bead> = {
            let mut batch = self.batch.lock().unwrap_or_else(|e| e.into_inner());
            let events = std::mem::take(&mut batch.events);
            batch.armed = false;
            if events.len() > BATCH_THRESHOLD {
                events[BATCH_THRESHOLD..].to_vec()
            } else {
                Vec::new()
            }
        };

        if overflow.is_empty() {
            return;
        }

        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.jack_batch(&overflow).await {
                warn!(count = overflow.len(), error = %e, "jack batch notification failed");
            }
        } else {
            debug!(count = overflow.len(), "no notifier, dropping jack batch");
        }
    }

    /// Handle a closed event: at most one lowered notification per jack.
    pub async fn on_closed(&self, payload: &Value) {
        let Some(bead) = Self::decode(payload) else {
            return;
        };

        if self.lowered.seen(&dedup_key("lowered", &bead.id)) {
            return;
        }

        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.jack_lowered(&bead).await {
                warn!(id = %bead.id, error = %e, "jack lowered notification failed");
            }
        } else {
            debug!(id = %bead.id, "no notifier, skipping jack lowered");
        }
    }

    /// Handle an updated event: only escalated jacks matter, and each
    /// may re-notify once per expiry window while still overdue.
    pub async fn on_updated(&self, payload: &Value) {
        let Some(bead) = Self::decode(payload) else {
            return;
        };
        if !bead.has_escalated_label() {
            return;
        }
        if !self.expiry.try_acquire(&bead.id) {
            debug!(id = %bead.id, "expiry cooldown active");
            return;
        }

        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.jack_expired(&bead).await {
                warn!(id = %bead.id, error = %e, "jack expired notification failed");
            }
        } else {
            debug!(id = %bead.id, "no notifier, skipping jack expired");
        }
    }
}

#[cfg(test)]
#[path = "jack_tests.rs"]
mod tests;
