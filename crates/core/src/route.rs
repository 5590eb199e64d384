// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel router: maps actor identities to chat destinations.
//!
//! Resolution order:
//! 1. exact-identity override map (highest priority)
//! 2. ranked wildcard-pattern rules, first match wins
//! 3. the configured default destination
//!
//! Patterns are `/`-delimited segment sequences where each segment is a
//! literal or the single-segment wildcard `*`. Rules are ranked by
//! specificity: more literal segments wins, ties broken by fewer
//! wildcards, final tie broken lexicographically by pattern text so
//! resolution is deterministic. Ranking is recomputed when the rule set
//! changes, not on every resolution.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::RwLock;

/// A ranked routing rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub pattern: String,
    pub destination: String,
    literals: usize,
    wildcards: usize,
}

impl RouteRule {
    fn new(pattern: &str, destination: &str) -> Self {
        let literals = pattern.split('/').filter(|s| *s != "*").count();
        let wildcards = pattern.split('/').filter(|s| *s == "*").count();
        Self {
            pattern: pattern.to_string(),
            destination: destination.to_string(),
            literals,
            wildcards,
        }
    }

    fn matches(&self, identity: &str) -> bool {
        let pattern: Vec<&str> = self.pattern.split('/').collect();
        let identity: Vec<&str> = identity.split('/').collect();
        if pattern.len() != identity.len() {
            return false;
        }
        pattern
            .iter()
            .zip(&identity)
            .all(|(p, seg)| *p == "*" || p == seg)
    }
}

/// Result of a route resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub destination: String,
    /// Pattern text of the rule that matched, if any.
    pub rule: Option<String>,
    /// True when the default destination was used.
    pub is_default: bool,
}

#[derive(Debug, Default)]
struct RouterState {
    overrides: HashMap<String, String>,
    /// Sorted most-specific first; re-sorted on mutation only.
    rules: Vec<RouteRule>,
    default_destination: String,
}

/// Thread-safe actor-identity to destination-channel router.
#[derive(Debug)]
pub struct ChannelRouter {
    state: RwLock<RouterState>,
}

impl ChannelRouter {
    pub fn new(default_destination: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(RouterState {
                default_destination: default_destination.into(),
                ..RouterState::default()
            }),
        }
    }

    /// Add a pattern rule. The rule list is re-ranked immediately.
    pub fn add_rule(&self, pattern: &str, destination: &str) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.rules.push(RouteRule::new(pattern, destination));
        state
            .rules
            .sort_by_key(|r| (Reverse(r.literals), r.wildcards, r.pattern.clone()));
    }

    /// Set an exact-identity override.
    pub fn add_override(&self, identity: &str, destination: &str) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state
            .overrides
            .insert(identity.to_string(), destination.to_string());
    }

    /// Remove an exact-identity override. Idempotent.
    pub fn remove_override(&self, identity: &str) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.overrides.remove(identity);
    }

    /// Reverse lookup over overrides only: the first identity (in
    /// unspecified order) whose override points at `destination`.
    pub fn identity_for_destination(&self, destination: &str) -> Option<String> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state
            .overrides
            .iter()
            .find(|(_, dest)| dest.as_str() == destination)
            .map(|(identity, _)| identity.clone())
    }

    /// Resolve an actor identity to a destination channel.
    pub fn resolve(&self, identity: &str) -> RouteMatch {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());

        if let Some(destination) = state.overrides.get(identity) {
            return RouteMatch {
                destination: destination.clone(),
                rule: None,
                is_default: false,
            };
        }

        for rule in &state.rules {
            if rule.matches(identity) {
                return RouteMatch {
                    destination: rule.destination.clone(),
                    rule: Some(rule.pattern.clone()),
                    is_default: false,
                };
            }
        }

        RouteMatch {
            destination: state.default_destination.clone(),
            rule: None,
            is_default: true,
        }
    }
}

#[cfg(test)]
#[path = "route_tests.rs"]
mod tests;
