// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bridge lifecycle management: startup, wiring, shutdown.
//!
//! Startup acquires the single-instance lock, loads the config, builds
//! the real adapters, and subscribes one task per watcher handler to
//! the dispatcher. A watch channel carries the shutdown signal to the
//! poller; event-driven watchers stop when their subscription task is
//! aborted.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bb_adapters::{BdStore, HttpTracker, WebhookNotifier};
use bb_core::clock::SystemClock;
use bb_core::config::{BridgeConfig, ConfigError};
use bb_core::dedup::DedupRegistry;
use bb_engine::{
    catch_up_decisions, topic, Dispatcher, JackWatcher, NudgeWatcher, SyncBackWatcher,
    TrackerPoller,
};
use fs2::FileExt;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::ingest;

/// Filesystem locations the bridge daemon uses.
#[derive(Debug, Clone)]
pub struct Paths {
    /// TOML config file
    pub config_path: PathBuf,
    /// Lock/PID file
    pub lock_path: PathBuf,
    /// Daemon log file
    pub log_path: PathBuf,
}

impl Paths {
    /// Resolve paths from the environment: state under `XDG_STATE_HOME`
    /// (or `~/.local/state`), config from the argument or the working
    /// directory.
    pub fn resolve(config_path: Option<PathBuf>) -> Result<Self, LifecycleError> {
        let state = state_dir()?;
        Ok(Self::under(&state, config_path))
    }

    /// Lay out paths under an explicit state directory.
    pub fn under(state_dir: &Path, config_path: Option<PathBuf>) -> Self {
        Self {
            config_path: config_path.unwrap_or_else(|| PathBuf::from("beads-bridge.toml")),
            lock_path: state_dir.join("bbd.pid"),
            log_path: state_dir.join("bbd.log"),
        }
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: bridge already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Running bridge: dispatcher plus the spawned watcher tasks.
#[derive(Debug)]
pub struct Bridge {
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    lock_path: PathBuf,
    /// Fan-out point for incoming event frames
    pub dispatcher: Dispatcher,
    /// Decision dedup state, shared with the startup catch-up task so
    /// its marks survive after the task finishes.
    pub decision_dedup: Arc<DedupRegistry>,
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl Bridge {
    /// Feed one stdin line into the dispatcher.
    pub fn ingest_line(&self, line: &str) {
        match ingest::parse_frame(line) {
            Some(frame) => self.dispatcher.publish(&frame.topic, frame.payload),
            None => tracing::debug!("undecodable event frame, dropped"),
        }
    }

    /// Stop the poller, abort watcher tasks, release the lock file.
    pub async fn shutdown(&mut self) {
        info!("Shutting down bridge...");
        let _ = self.shutdown_tx.send(true);
        for task in self.tasks.drain(..) {
            task.abort();
        }
        if self.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }
        info!("Bridge shutdown complete");
    }
}

/// Start the bridge: lock, config, adapters, watchers.
pub async fn startup(paths: &Paths) -> Result<Bridge, LifecycleError> {
    // 1. Acquire the lock file FIRST - prevents races
    if let Some(parent) = paths.lock_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let lock_file = File::create(&paths.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    // Write PID to lock file
    let mut lock_file = lock_file;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    // 2. Load configuration; a missing file means defaults
    let config = if paths.config_path.exists() {
        BridgeConfig::load(&paths.config_path)?
    } else {
        info!(
            "No config at {}, using defaults",
            paths.config_path.display()
        );
        BridgeConfig::parse("")?
    };

    // 3. Build the real adapters
    let router = Arc::new(config.build_router());
    let notifier = config
        .chat
        .webhook_url
        .clone()
        .map(|url| Arc::new(WebhookNotifier::new(url, Arc::clone(&router))));
    if notifier.is_none() {
        info!("No chat webhook configured; notifications are logged and dropped");
    }
    let store = Arc::new(BdStore::new("bd"));
    let tracker = config
        .tracker
        .base_url
        .clone()
        .map(|base| Arc::new(HttpTracker::new(base, config.tracker.token.clone())));

    let dispatcher = Dispatcher::new();
    let (shutdown_tx, _shutdown_rx) = watch::channel(false);
    let mut tasks = Vec::new();

    // 4. Jack lifecycle watcher on all three topics
    let jack = Arc::new(JackWatcher::new(notifier.clone(), SystemClock));
    {
        let mut rx = dispatcher.subscribe(topic::BEAD_CREATED);
        let jack = Arc::clone(&jack);
        tasks.push(tokio::spawn(async move {
            while let Some(payload) = rx.recv().await {
                jack.on_created(&payload).await;
            }
        }));
    }
    {
        let mut rx = dispatcher.subscribe(topic::BEAD_UPDATED);
        let jack = Arc::clone(&jack);
        tasks.push(tokio::spawn(async move {
            while let Some(payload) = rx.recv().await {
                jack.on_updated(&payload).await;
            }
        }));
    }
    {
        let mut rx = dispatcher.subscribe(topic::BEAD_CLOSED);
        let jack = Arc::clone(&jack);
        tasks.push(tokio::spawn(async move {
            while let Some(payload) = rx.recv().await {
                jack.on_closed(&payload).await;
            }
        }));
    }

    // 5. Nudge watcher, only with a real notifier to deliver through
    if let Some(notifier) = notifier.clone() {
        let nudge = Arc::new(NudgeWatcher::new(
            notifier,
            Arc::clone(&store),
            config.nudge.window,
            SystemClock,
        ));
        {
            let mut rx = dispatcher.subscribe(topic::BEAD_UPDATED);
            let nudge = Arc::clone(&nudge);
            tasks.push(tokio::spawn(async move {
                while let Some(payload) = rx.recv().await {
                    nudge.on_updated(&payload).await;
                }
            }));
        }
        {
            let mut rx = dispatcher.subscribe(topic::BEAD_CLOSED);
            let nudge = Arc::clone(&nudge);
            tasks.push(tokio::spawn(async move {
                while let Some(payload) = rx.recv().await {
                    nudge.on_closed(&payload).await;
                }
            }));
        }
    }

    // 6. Tracker sync-back and poller, only with a tracker configured
    if let Some(tracker) = tracker.clone() {
        let sync = Arc::new(SyncBackWatcher::new(
            Arc::clone(&tracker),
            SystemClock,
            !config.tracker.disable_transitions,
        ));
        {
            let mut rx = dispatcher.subscribe(topic::BEAD_UPDATED);
            let sync = Arc::clone(&sync);
            tasks.push(tokio::spawn(async move {
                while let Some(payload) = rx.recv().await {
                    sync.on_updated(&payload).await;
                }
            }));
        }
        {
            let mut rx = dispatcher.subscribe(topic::BEAD_CLOSED);
            let sync = Arc::clone(&sync);
            tasks.push(tokio::spawn(async move {
                while let Some(payload) = rx.recv().await {
                    sync.on_closed(&payload).await;
                }
            }));
        }

        if config.poller.project.is_empty() {
            info!("No poller project configured; tracker polling disabled");
        } else {
            let poller = TrackerPoller::new(
                Arc::clone(&store),
                Arc::clone(&tracker),
                config.poller.clone(),
            );
            let shutdown_rx = shutdown_tx.subscribe();
            tasks.push(tokio::spawn(async move {
                poller.run(shutdown_rx).await;
            }));
        }
    } else {
        info!("No tracker configured; sync-back and polling disabled");
    }

    // 7. Decision catch-up runs once in the background
    let decision_dedup = Arc::new(DedupRegistry::new());
    {
        let store = Arc::clone(&store);
        let notifier = notifier.clone();
        let registry = Arc::clone(&decision_dedup);
        tasks.push(tokio::spawn(async move {
            let sent = catch_up_decisions(Some(store.as_ref()), notifier.as_deref(), &registry).await;
            info!(sent, "startup decision catch-up finished");
        }));
    }

    info!("Bridge started");

    Ok(Bridge {
        lock_file,
        lock_path: paths.lock_path.clone(),
        dispatcher,
        decision_dedup,
        shutdown_tx,
        tasks,
    })
}

/// Get the state directory for the bridge
fn state_dir() -> Result<PathBuf, LifecycleError> {
    // Use XDG_STATE_HOME or default to ~/.local/state
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("beads-bridge"));
    }

    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/beads-bridge"))
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
