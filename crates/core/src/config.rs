// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bridge configuration, loaded from TOML.
//!
//! Route overrides added at runtime live only in the router; nothing is
//! written back to disk.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level bridge configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub routes: RouteConfig,
    #[serde(default)]
    pub nudge: NudgeConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub poller: PollerConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Webhook URL for outbound chat notifications. Absent means
    /// notifications are logged and dropped.
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    #[serde(default = "default_channel")]
    pub default_channel: String,
    /// Wildcard pattern rules, ranked by specificity at load.
    #[serde(default)]
    pub rules: Vec<RouteRuleConfig>,
    /// Exact identity -> channel overrides.
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteRuleConfig {
    pub pattern: String,
    pub channel: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NudgeConfig {
    /// Minimum gap between nudges for the same bead.
    #[serde(with = "humantime_serde", default = "default_nudge_window")]
    pub window: Duration,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    /// Base URL of the external tracker REST API. Absent disables the
    /// poller and sync-back watcher.
    pub base_url: Option<String>,
    #[serde(default)]
    pub token: String,
    /// Administratively disable workflow transitions on sync-back.
    #[serde(default)]
    pub disable_transitions: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PollerConfig {
    /// Tracker project to poll.
    #[serde(default)]
    pub project: String,
    /// Tracker statuses to poll for.
    #[serde(default)]
    pub statuses: Vec<String>,
    /// Tracker issue types to poll for.
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(with = "humantime_serde", default = "default_poll_interval")]
    pub interval: Duration,
    /// Page cap for each search.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Bead kind created for imported issues.
    #[serde(default = "default_bead_kind")]
    pub bead_kind: String,
}

fn default_channel() -> String {
    "#beads".to_string()
}

fn default_nudge_window() -> Duration {
    Duration::from_secs(5 * 60)
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(60)
}

fn default_page_size() -> usize {
    50
}

fn default_bead_kind() -> String {
    "issue".to_string()
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            default_channel: default_channel(),
            rules: Vec::new(),
            overrides: HashMap::new(),
        }
    }
}

impl Default for NudgeConfig {
    fn default() -> Self {
        Self {
            window: default_nudge_window(),
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            project: String::new(),
            statuses: Vec::new(),
            types: Vec::new(),
            interval: default_poll_interval(),
            page_size: default_page_size(),
            bead_kind: default_bead_kind(),
        }
    }
}

impl BridgeConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Build the channel router from the route section.
    pub fn build_router(&self) -> crate::route::ChannelRouter {
        let router = crate::route::ChannelRouter::new(self.routes.default_channel.clone());
        for rule in &self.routes.rules {
            router.add_rule(&rule.pattern, &rule.channel);
        }
        for (identity, channel) in &self.routes.overrides {
            router.add_override(identity, channel);
        }
        router
    }
}
