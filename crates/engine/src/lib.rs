// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bb-engine: The stateful watchers behind the beads-bridge.
//!
//! Each watcher consumes raw payloads from the upstream dispatcher,
//! decides relevance on its own, consults its dedup/cooldown state
//! under its own lock, and calls out to the injected collaborators
//! outside that lock. Nothing here is fatal: collaborator failures are
//! logged and naturally retried on the next event or tick.

pub mod catchup;
pub mod dispatch;
pub mod jack;
pub mod nudge;
pub mod poller;
pub mod syncback;

pub use catchup::catch_up_decisions;
pub use dispatch::{topic, Dispatcher};
pub use jack::JackWatcher;
pub use nudge::NudgeWatcher;
pub use poller::TrackerPoller;
pub use syncback::SyncBackWatcher;
