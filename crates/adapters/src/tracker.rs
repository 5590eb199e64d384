// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authenticated REST client for the external issue tracker.
//!
//! All calls are blocking ureq requests run under `spawn_blocking` with
//! a bounded global timeout, so a stuck tracker can never hold up a
//! watcher (watcher locks are released before any outbound call).

use async_trait::async_trait;
use bb_core::adapters::{RemoteIssue, RemoteTransition, Tracker, TrackerError, TrackerQuery};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the tracker filter expression for a poll query: configured
/// project/status/type criteria, newest first.
pub fn build_query(query: &TrackerQuery) -> String {
    let mut clauses = Vec::new();
    if !query.project.is_empty() {
        clauses.push(format!("project = {}", query.project));
    }
    if !query.statuses.is_empty() {
        clauses.push(format!("status IN ({})", quote_list(&query.statuses)));
    }
    if !query.types.is_empty() {
        clauses.push(format!("type IN ({})", quote_list(&query.types)));
    }
    format!("{} ORDER BY created DESC", clauses.join(" AND "))
}

fn quote_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("\"{}\"", v))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<RemoteIssue>,
}

#[derive(Debug, Deserialize)]
struct TransitionsResponse {
    #[serde(default)]
    transitions: Vec<RemoteTransition>,
}

/// Real tracker client over authenticated HTTP.
#[derive(Clone)]
pub struct HttpTracker {
    agent: Agent,
    base_url: String,
    token: String,
}

impl HttpTracker {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build();
        Self {
            agent: config.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn auth(&self) -> String {
        format!("Bearer {}", self.token)
    }

    fn map_error(key: &str, err: &ureq::Error) -> TrackerError {
        debug!(key, error = %err, "tracker request failed");
        if let ureq::Error::StatusCode(404) = err {
            return TrackerError::NotFound(key.to_string());
        }
        TrackerError::Request(err.to_string())
    }

    fn search_blocking(&self, query: &TrackerQuery) -> Result<Vec<RemoteIssue>, TrackerError> {
        let mut response = self
            .agent
            .post(format!("{}/search", self.base_url).as_str())
            .header("Authorization", self.auth().as_str())
            .send_json(json!({
                "query": build_query(query),
                "max_results": query.max_results,
            }))
            .map_err(|e| {
                debug!(error = %e, "tracker search failed");
                TrackerError::Request(e.to_string())
            })?;

        let parsed: SearchResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| TrackerError::Request(e.to_string()))?;
        Ok(parsed.issues)
    }

    fn get_blocking(&self, key: &str) -> Result<RemoteIssue, TrackerError> {
        let mut response = self
            .agent
            .get(format!("{}/issue/{}", self.base_url, key).as_str())
            .header("Authorization", self.auth().as_str())
            .call()
            .map_err(|e| Self::map_error(key, &e))?;

        response
            .body_mut()
            .read_json()
            .map_err(|e| TrackerError::Request(e.to_string()))
    }

    fn transitions_blocking(&self, key: &str) -> Result<Vec<RemoteTransition>, TrackerError> {
        let mut response = self
            .agent
            .get(format!("{}/issue/{}/transitions", self.base_url, key).as_str())
            .header("Authorization", self.auth().as_str())
            .call()
            .map_err(|e| Self::map_error(key, &e))?;

        let parsed: TransitionsResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| TrackerError::Request(e.to_string()))?;
        Ok(parsed.transitions)
    }

    fn apply_transition_blocking(&self, key: &str, id: &str) -> Result<(), TrackerError> {
        self.agent
            .post(format!("{}/issue/{}/transitions", self.base_url, key).as_str())
            .header("Authorization", self.auth().as_str())
            .send_json(json!({"transition": {"id": id}}))
            .map_err(|e| Self::map_error(key, &e))?;
        Ok(())
    }

    fn add_comment_blocking(&self, key: &str, body: &str) -> Result<(), TrackerError> {
        self.agent
            .post(format!("{}/issue/{}/comment", self.base_url, key).as_str())
            .header("Authorization", self.auth().as_str())
            .send_json(json!({"body": body}))
            .map_err(|e| Self::map_error(key, &e))?;
        Ok(())
    }

    fn add_remote_link_blocking(&self, key: &str, url: &str, title: &str) -> Result<(), TrackerError> {
        self.agent
            .post(format!("{}/issue/{}/remotelink", self.base_url, key).as_str())
            .header("Authorization", self.auth().as_str())
            .send_json(json!({"object": {"url": url, "title": title}}))
            .map_err(|e| Self::map_error(key, &e))?;
        Ok(())
    }
}

async fn blocking<T, F>(task: F) -> Result<T, TrackerError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, TrackerError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| TrackerError::Request(format!("tracker task aborted: {}", e)))?
}

#[async_trait]
impl Tracker for HttpTracker {
    async fn search(&self, query: &TrackerQuery) -> Result<Vec<RemoteIssue>, TrackerError> {
        let this = self.clone();
        let query = query.clone();
        blocking(move || this.search_blocking(&query)).await
    }

    async fn get(&self, key: &str) -> Result<RemoteIssue, TrackerError> {
        let this = self.clone();
        let key = key.to_string();
        blocking(move || this.get_blocking(&key)).await
    }

    async fn transitions(&self, key: &str) -> Result<Vec<RemoteTransition>, TrackerError> {
        let this = self.clone();
        let key = key.to_string();
        blocking(move || this.transitions_blocking(&key)).await
    }

    async fn apply_transition(&self, key: &str, transition_id: &str) -> Result<(), TrackerError> {
        let this = self.clone();
        let key = key.to_string();
        let id = transition_id.to_string();
        blocking(move || this.apply_transition_blocking(&key, &id)).await
    }

    async fn add_comment(&self, key: &str, body: &str) -> Result<(), TrackerError> {
        let this = self.clone();
        let key = key.to_string();
        let body = body.to_string();
        blocking(move || this.add_comment_blocking(&key, &body)).await
    }

    async fn add_remote_link(
        &self,
        key: &str,
        url: &str,
        title: &str,
    ) -> Result<(), TrackerError> {
        let this = self.clone();
        let key = key.to_string();
        let url = url.to_string();
        let title = title.to_string();
        blocking(move || this.add_remote_link_blocking(&key, &url, &title)).await
    }
}
