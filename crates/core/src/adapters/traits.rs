// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter trait definitions for external collaborators.
//!
//! Watchers are injected with these interfaces rather than concrete
//! types: one real implementation per backend plus recording fakes for
//! tests (see bb-adapters). Every call can fail with a transient error;
//! watchers log and move on, never crash.

use crate::bead::{Bead, NewBead};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

// =============================================================================
// Chat notifier
// =============================================================================

/// Errors from notification delivery
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification failed: {0}")]
    Failed(String),
}

/// One method per notification kind. Implementations own the message
/// templates; the engine only decides whether and what to notify.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// A jack (help flag) was raised.
    async fn jack_raised(&self, bead: &Bead) -> Result<(), NotifyError>;

    /// A jack was lowered (closed).
    async fn jack_lowered(&self, bead: &Bead) -> Result<(), NotifyError>;

    /// A raised jack is overdue and escalated.
    async fn jack_expired(&self, bead: &Bead) -> Result<(), NotifyError>;

    /// Summary for a burst of jacks beyond the batch threshold.
    async fn jack_batch(&self, beads: &[Bead]) -> Result<(), NotifyError>;

    /// A new open decision was discovered.
    async fn decision_posted(&self, bead: &Bead) -> Result<(), NotifyError>;

    /// A decision carries a resolution.
    async fn decision_resolved(&self, bead: &Bead) -> Result<(), NotifyError>;

    /// A claimed bead was updated; `destination` is the resolved
    /// callback channel for the assignee.
    async fn claimed_updated(&self, bead: &Bead, destination: &str) -> Result<(), NotifyError>;

    /// A claimed bead was closed.
    async fn claimed_closed(&self, bead: &Bead, destination: &str) -> Result<(), NotifyError>;
}

// =============================================================================
// Bead store
// =============================================================================

/// Errors from bead store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("bead not found: {0}")]
    NotFound(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The authoritative work-item store.
#[async_trait]
pub trait BeadStore: Send + Sync + 'static {
    /// List beads, optionally filtered by kind and/or label.
    async fn list(&self, kind: Option<&str>, label: Option<&str>)
        -> Result<Vec<Bead>, StoreError>;

    /// Fetch a single bead by id.
    async fn get(&self, id: &str) -> Result<Bead, StoreError>;

    /// Create a bead, returning its id.
    async fn create(&self, new: &NewBead) -> Result<String, StoreError>;

    /// Close a bead, attaching the given fields.
    async fn close(&self, id: &str, fields: &HashMap<String, String>) -> Result<(), StoreError>;
}

// =============================================================================
// External issue tracker
// =============================================================================

/// Errors from tracker operations
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("issue not found: {0}")]
    NotFound(String),
    #[error("request failed: {0}")]
    Request(String),
}

/// An issue as returned by the external tracker.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteIssue {
    pub key: String,
    #[serde(default)]
    pub summary: String,
    /// Rich-text document tree; rendered via [`crate::markdown`].
    #[serde(default)]
    pub description: serde_json::Value,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub issue_type: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub parent_key: Option<String>,
    #[serde(default)]
    pub reporter: Option<String>,
    #[serde(default)]
    pub created: Option<chrono::DateTime<chrono::Utc>>,
}

/// A workflow transition available on a tracker issue.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteTransition {
    pub id: String,
    pub name: String,
    /// Name of the status this transition lands on.
    #[serde(default)]
    pub to_status: String,
}

/// Search criteria for the poller, newest-first, capped at `max_results`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerQuery {
    pub project: String,
    pub statuses: Vec<String>,
    pub types: Vec<String>,
    pub max_results: usize,
}

/// Authenticated client for the external issue tracker.
#[async_trait]
pub trait Tracker: Send + Sync + 'static {
    /// Search issues matching the query, newest first.
    async fn search(&self, query: &TrackerQuery) -> Result<Vec<RemoteIssue>, TrackerError>;

    /// Fetch a single issue by key.
    async fn get(&self, key: &str) -> Result<RemoteIssue, TrackerError>;

    /// List the transitions currently available on an issue.
    async fn transitions(&self, key: &str) -> Result<Vec<RemoteTransition>, TrackerError>;

    /// Apply a transition by its id.
    async fn apply_transition(&self, key: &str, transition_id: &str) -> Result<(), TrackerError>;

    /// Add a comment to an issue.
    async fn add_comment(&self, key: &str, body: &str) -> Result<(), TrackerError>;

    /// Attach a remote link to an issue.
    async fn add_remote_link(&self, key: &str, url: &str, title: &str)
        -> Result<(), TrackerError>;
}
