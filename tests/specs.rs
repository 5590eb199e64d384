//! Behavioral specifications for the beads-bridge.
//!
//! These tests are end-to-end over the engine: raw event frames go
//! through the dispatcher exactly as the daemon publishes them, and the
//! assertions run against the recording fake adapters.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/jack.rs"]
mod jack;
#[path = "specs/nudge.rs"]
mod nudge;
#[path = "specs/poller.rs"]
mod poller;
#[path = "specs/routing.rs"]
mod routing;
#[path = "specs/syncback.rs"]
mod syncback;
