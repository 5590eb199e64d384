// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording fake adapters for testing.
#![cfg_attr(coverage_nightly, coverage(off))]

use async_trait::async_trait;
use bb_core::adapters::{
    BeadStore, Notifier, NotifyError, RemoteIssue, RemoteTransition, StoreError, Tracker,
    TrackerError, TrackerQuery,
};
use bb_core::bead::{Bead, NewBead};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

// =============================================================================
// Notifier
// =============================================================================

/// Recorded notifier call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyCall {
    JackRaised(String),
    JackLowered(String),
    JackExpired(String),
    JackBatch(Vec<String>),
    DecisionPosted(String),
    DecisionResolved(String),
    ClaimedUpdated { id: String, destination: String },
    ClaimedClosed { id: String, destination: String },
}

/// Fake notifier recording every call.
#[derive(Clone, Default)]
pub struct FakeNotifier {
    calls: Arc<Mutex<Vec<NotifyCall>>>,
    fail: Arc<AtomicBool>,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail.
    pub fn fail_all(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<NotifyCall> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: NotifyCall) -> Result<(), NotifyError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Failed("fake notifier failure".to_string()));
        }
        lock(&self.calls).push(call);
        Ok(())
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn jack_raised(&self, bead: &Bead) -> Result<(), NotifyError> {
        self.record(NotifyCall::JackRaised(bead.id.clone()))
    }

    async fn jack_lowered(&self, bead: &Bead) -> Result<(), NotifyError> {
        self.record(NotifyCall::JackLowered(bead.id.clone()))
    }

    async fn jack_expired(&self, bead: &Bead) -> Result<(), NotifyError> {
        self.record(NotifyCall::JackExpired(bead.id.clone()))
    }

    async fn jack_batch(&self, beads: &[Bead]) -> Result<(), NotifyError> {
        self.record(NotifyCall::JackBatch(
            beads.iter().map(|b| b.id.clone()).collect(),
        ))
    }

    async fn decision_posted(&self, bead: &Bead) -> Result<(), NotifyError> {
        self.record(NotifyCall::DecisionPosted(bead.id.clone()))
    }

    async fn decision_resolved(&self, bead: &Bead) -> Result<(), NotifyError> {
        self.record(NotifyCall::DecisionResolved(bead.id.clone()))
    }

    async fn claimed_updated(&self, bead: &Bead, destination: &str) -> Result<(), NotifyError> {
        self.record(NotifyCall::ClaimedUpdated {
            id: bead.id.clone(),
            destination: destination.to_string(),
        })
    }

    async fn claimed_closed(&self, bead: &Bead, destination: &str) -> Result<(), NotifyError> {
        self.record(NotifyCall::ClaimedClosed {
            id: bead.id.clone(),
            destination: destination.to_string(),
        })
    }
}

// =============================================================================
// Bead store
// =============================================================================

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List {
        kind: Option<String>,
        label: Option<String>,
    },
    Get(String),
    Create(String),
    Close(String),
}

/// Fake in-memory bead store.
#[derive(Clone, Default)]
pub struct FakeStore {
    beads: Arc<Mutex<HashMap<String, Bead>>>,
    created: Arc<Mutex<Vec<NewBead>>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    next_id: Arc<AtomicUsize>,
    fail_create: Arc<AtomicBool>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a bead into the store.
    pub fn insert(&self, bead: Bead) {
        lock(&self.beads).insert(bead.id.clone(), bead);
    }

    /// Make every subsequent create fail.
    pub fn fail_creates(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    /// All NewBead payloads passed to create, in order.
    pub fn created(&self) -> Vec<NewBead> {
        lock(&self.created).clone()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl BeadStore for FakeStore {
    async fn list(
        &self,
        kind: Option<&str>,
        label: Option<&str>,
    ) -> Result<Vec<Bead>, StoreError> {
        lock(&self.calls).push(StoreCall::List {
            kind: kind.map(String::from),
            label: label.map(String::from),
        });
        let beads = lock(&self.beads);
        let mut matched: Vec<Bead> = beads
            .values()
            .filter(|b| kind.is_none_or(|k| b.kind == k))
            .filter(|b| label.is_none_or(|l| b.has_label(l)))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matched)
    }

    async fn get(&self, id: &str) -> Result<Bead, StoreError> {
        lock(&self.calls).push(StoreCall::Get(id.to_string()));
        lock(&self.beads)
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create(&self, new: &NewBead) -> Result<String, StoreError> {
        lock(&self.calls).push(StoreCall::Create(new.title.clone()));
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("fake create failure".to_string()));
        }
        let id = format!("bd-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let bead = Bead {
            id: id.clone(),
            kind: new.kind.clone(),
            title: new.title.clone(),
            status: "open".to_string(),
            assignee: String::new(),
            labels: new.labels.clone(),
            fields: new.fields.clone(),
        };
        lock(&self.beads).insert(id.clone(), bead);
        lock(&self.created).push(new.clone());
        Ok(id)
    }

    async fn close(&self, id: &str, _fields: &HashMap<String, String>) -> Result<(), StoreError> {
        lock(&self.calls).push(StoreCall::Close(id.to_string()));
        let mut beads = lock(&self.beads);
        match beads.get_mut(id) {
            Some(bead) => {
                bead.status = "closed".to_string();
                Ok(())
            }
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }
}

// =============================================================================
// Tracker
// =============================================================================

/// Recorded tracker call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    Search(TrackerQuery),
    Get(String),
    Transitions(String),
    ApplyTransition { key: String, id: String },
    AddComment { key: String, body: String },
    AddRemoteLink { key: String, url: String },
}

/// Fake tracker with a fixed result set.
#[derive(Clone, Default)]
pub struct FakeTracker {
    issues: Arc<Mutex<Vec<RemoteIssue>>>,
    transitions: Arc<Mutex<Vec<RemoteTransition>>>,
    calls: Arc<Mutex<Vec<TrackerCall>>>,
    fail_transitions: Arc<AtomicBool>,
}

impl FakeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issues(issues: Vec<RemoteIssue>) -> Self {
        let tracker = Self::default();
        *lock(&tracker.issues) = issues;
        tracker
    }

    pub fn set_transitions(&self, transitions: Vec<RemoteTransition>) {
        *lock(&self.transitions) = transitions;
    }

    /// Make apply_transition fail, modelling a transition unavailable in
    /// the external workflow.
    pub fn fail_transitions(&self) {
        self.fail_transitions.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<TrackerCall> {
        lock(&self.calls).clone()
    }

    pub fn search_count(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| matches!(c, TrackerCall::Search(_)))
            .count()
    }
}

#[async_trait]
impl Tracker for FakeTracker {
    async fn search(&self, query: &TrackerQuery) -> Result<Vec<RemoteIssue>, TrackerError> {
        lock(&self.calls).push(TrackerCall::Search(query.clone()));
        let issues = lock(&self.issues);
        Ok(issues.iter().take(query.max_results).cloned().collect())
    }

    async fn get(&self, key: &str) -> Result<RemoteIssue, TrackerError> {
        lock(&self.calls).push(TrackerCall::Get(key.to_string()));
        lock(&self.issues)
            .iter()
            .find(|i| i.key == key)
            .cloned()
            .ok_or_else(|| TrackerError::NotFound(key.to_string()))
    }

    async fn transitions(&self, key: &str) -> Result<Vec<RemoteTransition>, TrackerError> {
        lock(&self.calls).push(TrackerCall::Transitions(key.to_string()));
        Ok(lock(&self.transitions).clone())
    }

    async fn apply_transition(&self, key: &str, transition_id: &str) -> Result<(), TrackerError> {
        lock(&self.calls).push(TrackerCall::ApplyTransition {
            key: key.to_string(),
            id: transition_id.to_string(),
        });
        if self.fail_transitions.load(Ordering::SeqCst) {
            return Err(TrackerError::Request(
                "transition unavailable".to_string(),
            ));
        }
        Ok(())
    }

    async fn add_comment(&self, key: &str, body: &str) -> Result<(), TrackerError> {
        lock(&self.calls).push(TrackerCall::AddComment {
            key: key.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }

    async fn add_remote_link(
        &self,
        key: &str,
        url: &str,
        _title: &str,
    ) -> Result<(), TrackerError> {
        lock(&self.calls).push(TrackerCall::AddRemoteLink {
            key: key.to_string(),
            url: url.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
