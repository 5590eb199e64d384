// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External-tracker poller: imports tracker issues as beads.
//!
//! Keeps a tracked-key map (external key -> bead id) as its dedup
//! state. The map is rebuilt from the bead store at startup and
//! opportunistically on every tick, so lost state after a crash heals
//! itself; a tick is two phases, cheap reconciliation then the
//! search/create pass, and a partial failure in either only delays
//! completeness, never corrupts the map.

use bb_core::bead::{NewBead, EXTERNAL_KEY_FIELD, EXTERNAL_LABEL_PREFIX};
use bb_core::config::PollerConfig;
use bb_core::markdown;
use bb_core::priority::priority_from_name;
use bb_core::{BeadStore, RemoteIssue, StoreError, Tracker, TrackerQuery};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{info, warn};

/// Label marking a bead as imported from the tracker.
pub const SOURCE_LABEL: &str = "from-tracker";

/// Structured fields carried on imported beads.
pub const FIELD_PROJECT: &str = "tracker_project";
pub const FIELD_TYPE: &str = "tracker_type";
pub const FIELD_STATUS: &str = "tracker_status";
pub const FIELD_URL: &str = "tracker_url";
pub const FIELD_PARENT: &str = "tracker_parent";
pub const FIELD_REPORTER: &str = "tracker_reporter";

/// Polls the external tracker and creates beads for new issues.
pub struct TrackerPoller<S: BeadStore, T: Tracker> {
    store: Arc<S>,
    tracker: Arc<T>,
    config: PollerConfig,
    tracked: Mutex<HashMap<String, String>>,
}

impl<S: BeadStore, T: Tracker> TrackerPoller<S, T> {
    pub fn new(store: Arc<S>, tracker: Arc<T>, config: PollerConfig) -> Self {
        Self {
            store,
            tracker,
            config,
            tracked: Mutex::new(HashMap::new()),
        }
    }

    /// Whether an external key is already mapped to a bead.
    pub fn is_tracked(&self, key: &str) -> bool {
        self.tracked
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(key)
    }

    pub fn tracked_len(&self) -> usize {
        self.tracked.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Rebuild the tracked map from the store. Existing entries win on
    /// conflict; the union is idempotent, so running this on every tick
    /// is safe and self-healing.
    pub async fn reconcile(&self) {
        let beads = match self.store.list(Some(&self.config.bead_kind), None).await {
            Ok(beads) => beads,
            Err(e) => {
                warn!(error = %e, "tracked-key reconciliation failed, keeping current map");
                return;
            }
        };

        let mut tracked = self.tracked.lock().unwrap_or_else(|e| e.into_inner());
        for bead in beads {
            if let Some(key) = bead.field(EXTERNAL_KEY_FIELD) {
                tracked.entry(key.to_string()).or_insert(bead.id.clone());
            }
        }
    }

    /// One poll cycle: reconcile, search, create beads for new issues.
    pub async fn poll_once(&self) {
        self.reconcile().await;

        let query = TrackerQuery {
            project: self.config.project.clone(),
            statuses: self.config.statuses.clone(),
            types: self.config.types.clone(),
            max_results: self.config.page_size,
        };
        let issues = match self.tracker.search(&query).await {
            Ok(issues) => issues,
            Err(e) => {
                warn!(error = %e, "tracker search failed, skipping cycle");
                return;
            }
        };

        for issue in issues {
            if self.is_tracked(&issue.key) {
                continue;
            }
            match self.import(&issue).await {
                Ok(id) => {
                    info!(key = %issue.key, bead = %id, "imported tracker issue");
                    // Record immediately: a failure later in the batch
                    // must not cause this issue to be recreated.
                    let mut tracked = self.tracked.lock().unwrap_or_else(|e| e.into_inner());
                    tracked.entry(issue.key.clone()).or_insert(id);
                }
                Err(e) => {
                    warn!(key = %issue.key, error = %e, "issue import failed, skipping");
                }
            }
        }
    }

    /// Poll at the configured interval until the shutdown signal fires.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        self.reconcile().await;

        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = ticker.tick() => self.poll_once().await,
                _ = shutdown.changed() => {
                    info!("tracker poller stopping");
                    return;
                }
            }
        }
    }

    async fn import(&self, issue: &RemoteIssue) -> Result<String, StoreError> {
        let project_tag = issue
            .key
            .split('-')
            .next()
            .unwrap_or(issue.key.as_str())
            .to_ascii_lowercase();

        let mut labels = vec![
            SOURCE_LABEL.to_string(),
            format!("{}{}", EXTERNAL_LABEL_PREFIX, issue.key),
            format!("project:{}", project_tag),
        ];
        labels.extend(issue.labels.iter().cloned());

        let mut fields = HashMap::from([
            (EXTERNAL_KEY_FIELD.to_string(), issue.key.clone()),
            (FIELD_PROJECT.to_string(), project_tag),
            (FIELD_TYPE.to_string(), issue.issue_type.clone()),
            (FIELD_STATUS.to_string(), issue.status.clone()),
            (FIELD_URL.to_string(), issue.url.clone()),
        ]);
        if let Some(parent) = &issue.parent_key {
            fields.insert(FIELD_PARENT.to_string(), parent.clone());
        }
        if let Some(reporter) = &issue.reporter {
            fields.insert(FIELD_REPORTER.to_string(), reporter.clone());
        }

        let new = NewBead {
            kind: self.config.bead_kind.clone(),
            title: format!("{}: {}", issue.key, issue.summary),
            description: markdown::render(&issue.description),
            priority: priority_from_name(&issue.priority),
            labels,
            fields,
        };
        self.store.create(&new).await
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
