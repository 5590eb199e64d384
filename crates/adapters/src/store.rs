// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bead store adapter backed by the `bd` CLI.

use async_trait::async_trait;
use bb_core::adapters::{BeadStore, StoreError};
use bb_core::bead::{Bead, NewBead};
use std::collections::HashMap;
use tokio::process::Command;

/// Real bead store shelling out to `bd` with JSON output.
#[derive(Clone)]
pub struct BdStore {
    bin: String,
}

impl Default for BdStore {
    fn default() -> Self {
        Self::new("bd")
    }
}

impl BdStore {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    fn command_error(id: Option<&str>, stderr: &str) -> StoreError {
        if let Some(id) = id {
            if stderr.contains("not found") {
                return StoreError::NotFound(id.to_string());
            }
        }
        StoreError::Unavailable(stderr.trim().to_string())
    }
}

#[async_trait]
impl BeadStore for BdStore {
    async fn list(
        &self,
        kind: Option<&str>,
        label: Option<&str>,
    ) -> Result<Vec<Bead>, StoreError> {
        let mut cmd = Command::new(&self.bin);
        cmd.args(["list", "--json"]);
        if let Some(kind) = kind {
            cmd.args(["--type", kind]);
        }
        if let Some(label) = label {
            cmd.args(["--label", label]);
        }

        let output = cmd.output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Self::command_error(None, &stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let beads: Vec<Bead> = serde_json::from_str(&stdout).unwrap_or_default();
        Ok(beads)
    }

    async fn get(&self, id: &str) -> Result<Bead, StoreError> {
        let output = Command::new(&self.bin)
            .args(["show", id, "--json"])
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Self::command_error(Some(id), &stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout).map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn create(&self, new: &NewBead) -> Result<String, StoreError> {
        let mut cmd = Command::new(&self.bin);
        cmd.args(["create", &new.title, "--json"]);
        cmd.args(["--type", &new.kind]);
        cmd.args(["--priority", &new.priority.to_string()]);
        if !new.description.is_empty() {
            cmd.args(["--description", &new.description]);
        }
        for label in &new.labels {
            cmd.args(["--label", label]);
        }
        for (key, value) in &new.fields {
            cmd.args(["--field", &format!("{}={}", key, value)]);
        }

        let output = cmd.output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Self::command_error(None, &stderr));
        }

        // `bd create --json` prints the created bead; fall back to the
        // raw line for older versions that print just the id.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let id = serde_json::from_str::<serde_json::Value>(stdout.trim())
            .ok()
            .and_then(|v| v.get("id").and_then(|id| id.as_str()).map(String::from))
            .unwrap_or_else(|| stdout.trim().to_string());

        if id.is_empty() {
            return Err(StoreError::Unavailable(
                "bd create returned no id".to_string(),
            ));
        }
        Ok(id)
    }

    async fn close(&self, id: &str, fields: &HashMap<String, String>) -> Result<(), StoreError> {
        let mut cmd = Command::new(&self.bin);
        cmd.args(["close", id]);
        for (key, value) in fields {
            cmd.args(["--field", &format!("{}={}", key, value)]);
        }

        let output = cmd.output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Self::command_error(Some(id), &stderr));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
