// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability traits for external collaborators.

pub mod traits;

pub use traits::{
    BeadStore, Notifier, NotifyError, RemoteIssue, RemoteTransition, StoreError, Tracker,
    TrackerError, TrackerQuery,
};
