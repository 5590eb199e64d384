// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! NDJSON event frames from the upstream stream.
//!
//! Each line on stdin is one frame: a topic name plus a raw payload.
//! Upstream delivery is not guaranteed well-formed, so undecodable
//! lines yield `None` and the caller drops them.

use serde::Deserialize;
use serde_json::Value;

/// One event frame off the stream.
#[derive(Debug, Deserialize)]
pub struct Frame {
    pub topic: String,
    #[serde(default)]
    pub payload: Value,
}

/// Decode one NDJSON line into a frame. Blank lines, invalid JSON, and
/// frames without a topic all yield `None`.
pub fn parse_frame(line: &str) -> Option<Frame> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let frame: Frame = serde_json::from_str(line).ok()?;
    if frame.topic.is_empty() {
        return None;
    }
    Some(frame)
}

#[cfg(test)]
#[path = "ingest_tests.rs"]
mod tests;
