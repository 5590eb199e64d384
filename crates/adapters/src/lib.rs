// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! bb-adapters: Real backends for the beads-bridge adapter traits.
//!
//! - [`BdStore`]: bead store backed by the `bd` CLI
//! - [`HttpTracker`]: authenticated REST client for the external tracker
//! - [`WebhookNotifier`]: chat notifications over a webhook
//!
//! Recording fakes for all three seams live in [`fake`] behind the
//! `test-support` feature.

pub mod chat;
pub mod store;
pub mod tracker;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use chat::WebhookNotifier;
pub use store::BdStore;
pub use tracker::HttpTracker;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNotifier, FakeStore, FakeTracker, NotifyCall, StoreCall, TrackerCall};
