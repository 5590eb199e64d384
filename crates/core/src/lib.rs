// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bb-core: Core library for the beads-bridge (bb) daemon
//!
//! This crate provides:
//! - The bead (work item) data model and event payload decoding
//! - Stateful notification primitives: dedup registry, cooldown gate,
//!   channel router
//! - Adapter traits for external collaborators (chat notifier, issue
//!   tracker, bead store)
//! - Rich-text to markdown rendering for imported issue descriptions

pub mod clock;

pub mod bead;
pub mod config;
pub mod cooldown;
pub mod dedup;
pub mod markdown;
pub mod priority;
pub mod route;

pub mod adapters;

// Re-exports
pub use bead::{Bead, NewBead, CHANGE_LINK_FIELD, ESCALATED_LABEL, EXTERNAL_KEY_FIELD};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{BridgeConfig, ConfigError};
pub use cooldown::CooldownGate;
pub use dedup::{dedup_key, DedupRegistry};
pub use route::{ChannelRouter, RouteMatch};

// Re-export adapter seams
pub use adapters::{
    BeadStore, Notifier, NotifyError, RemoteIssue, RemoteTransition, StoreError, Tracker,
    TrackerError, TrackerQuery,
};
