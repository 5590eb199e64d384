// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup catch-up over decision beads.
//!
//! The engine holds its dedup state in memory, so a restart forgets
//! which decisions were already announced. Catch-up walks the store at
//! startup: resolved decisions are marked seen without notifying,
//! unresolved ones are announced unless the registry already has them.

use bb_core::bead::Bead;
use bb_core::dedup::{dedup_key, DedupRegistry};
use bb_core::{BeadStore, Notifier};
use std::time::Duration;
use tracing::{info, warn};

/// Bead kind announced by decision notifications.
pub const DECISION_KIND: &str = "decision";

/// Field whose presence marks a decision as resolved.
pub const RESOLUTION_FIELD: &str = "resolution";

/// Gap between consecutive catch-up notifications.
pub const NOTIFY_THROTTLE: Duration = Duration::from_secs(1);

/// Walk open decisions at startup and announce the unseen ones.
/// Returns the number of notifications sent.
pub async fn catch_up_decisions<S: BeadStore, N: Notifier>(
    store: Option<&S>,
    notifier: Option<&N>,
    registry: &DedupRegistry,
) -> usize {
    let Some(store) = store else {
        return 0;
    };

    let decisions = match store.list(Some(DECISION_KIND), None).await {
        Ok(decisions) => decisions,
        Err(e) => {
            warn!(error = %e, "decision catch-up listing failed");
            return 0;
        }
    };

    let mut sent = 0;
    for decision in decisions {
        if is_resolved(&decision) {
            // Known-resolved decisions must never re-announce later.
            registry.mark(&dedup_key("resolved", &decision.id));
            continue;
        }
        if registry.seen(&dedup_key("created", &decision.id)) {
            continue;
        }
        let Some(notifier) = notifier else {
            continue;
        };
        if sent > 0 {
            tokio::time::sleep(NOTIFY_THROTTLE).await;
        }
        match notifier.decision_posted(&decision).await {
            Ok(()) => sent += 1,
            Err(e) => warn!(id = %decision.id, error = %e, "catch-up notification failed"),
        }
    }

    if sent > 0 {
        info!(sent, "decision catch-up complete");
    }
    sent
}

fn is_resolved(decision: &Bead) -> bool {
    decision.field(RESOLUTION_FIELD).is_some()
}

#[cfg(test)]
#[path = "catchup_tests.rs"]
mod tests;
