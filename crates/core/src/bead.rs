// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bead (work item) data model and event payload decoding.
//!
//! Watchers receive raw JSON payloads from the upstream dispatcher and
//! decode them here. Malformed payloads decode to `None`; upstream
//! delivery is not guaranteed well-formed, so decoding never errors.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Structured field holding the external tracker key (e.g. "PROJ-42").
pub const EXTERNAL_KEY_FIELD: &str = "tracker_key";

/// Structured field holding a merge/change request link.
pub const CHANGE_LINK_FIELD: &str = "merge_request";

/// Label marking a bead as escalated past its deadline. Matched
/// case/format-insensitively (see [`Bead::has_escalated_label`]).
pub const ESCALATED_LABEL: &str = "escalated";

/// Label prefix carrying the external tracker key, used as a fallback
/// when [`EXTERNAL_KEY_FIELD`] is absent.
pub const EXTERNAL_LABEL_PREFIX: &str = "tracker:";

/// A unit of tracked work, as delivered in event payloads and returned
/// by the bead store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bead {
    pub id: String,
    #[serde(default, alias = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub assignee: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub fields: HashMap<String, String>,
}

impl Bead {
    /// Decode a raw dispatcher payload. Returns `None` for anything that
    /// is not a bead-shaped object with a non-empty id.
    pub fn from_payload(payload: &serde_json::Value) -> Option<Self> {
        let bead: Self = serde_json::from_value(payload.clone()).ok()?;
        if bead.id.is_empty() {
            return None;
        }
        Some(bead)
    }

    /// Non-empty assignee, if any.
    pub fn assignee(&self) -> Option<&str> {
        if self.assignee.is_empty() {
            None
        } else {
            Some(&self.assignee)
        }
    }

    /// Non-empty structured field value, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// Exact label membership.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Whether any label matches [`ESCALATED_LABEL`], ignoring case and
    /// `-`/`_`/space formatting (so "Escalated" and "ESCALATED " match).
    pub fn has_escalated_label(&self) -> bool {
        self.labels
            .iter()
            .any(|l| normalize_label(l) == ESCALATED_LABEL)
    }

    /// Resolve the external tracker key: the structured field first,
    /// falling back to a `tracker:<KEY>` label.
    pub fn external_key(&self) -> Option<&str> {
        if let Some(key) = self.field(EXTERNAL_KEY_FIELD) {
            return Some(key);
        }
        self.labels
            .iter()
            .find_map(|l| l.strip_prefix(EXTERNAL_LABEL_PREFIX))
            .filter(|k| !k.is_empty())
    }
}

fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Payload for creating a bead in the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBead {
    pub kind: String,
    pub title: String,
    pub description: String,
    pub priority: u8,
    pub labels: Vec<String>,
    pub fields: HashMap<String, String>,
}

#[cfg(test)]
#[path = "bead_tests.rs"]
mod tests;
