// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chat notifier posting JSON payloads to a webhook.
//!
//! Message text stays deliberately thin; the chat platform owns the
//! presentation. Channel selection for jack/decision notifications runs
//! through the channel router on the bead's assignee identity.

use async_trait::async_trait;
use bb_core::adapters::{Notifier, NotifyError};
use bb_core::bead::Bead;
use bb_core::route::ChannelRouter;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Real notifier delivering to a chat webhook.
#[derive(Clone)]
pub struct WebhookNotifier {
    agent: Agent,
    url: String,
    router: Arc<ChannelRouter>,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, router: Arc<ChannelRouter>) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(NOTIFY_TIMEOUT))
            .build();
        Self {
            agent: config.into(),
            url: url.into(),
            router,
        }
    }

    fn channel_for(&self, bead: &Bead) -> String {
        self.router.resolve(&bead.assignee).destination
    }

    async fn post(&self, channel: String, text: String) -> Result<(), NotifyError> {
        let agent = self.agent.clone();
        let url = self.url.clone();
        tokio::task::spawn_blocking(move || {
            agent
                .post(url.as_str())
                .send_json(json!({"channel": channel, "text": text}))
                .map(|_| ())
                .map_err(|e| {
                    debug!(%channel, error = %e, "webhook post failed");
                    NotifyError::Failed(e.to_string())
                })
        })
        .await
        .map_err(|e| NotifyError::Failed(format!("notify task aborted: {}", e)))?
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn jack_raised(&self, bead: &Bead) -> Result<(), NotifyError> {
        let text = format!(":wave: jack raised: {} - {}", bead.id, bead.title);
        self.post(self.channel_for(bead), text).await
    }

    async fn jack_lowered(&self, bead: &Bead) -> Result<(), NotifyError> {
        let text = format!(":white_check_mark: jack lowered: {}", bead.id);
        self.post(self.channel_for(bead), text).await
    }

    async fn jack_expired(&self, bead: &Bead) -> Result<(), NotifyError> {
        let text = format!(":hourglass: jack still raised: {} - {}", bead.id, bead.title);
        self.post(self.channel_for(bead), text).await
    }

    async fn jack_batch(&self, beads: &[Bead]) -> Result<(), NotifyError> {
        let ids: Vec<&str> = beads.iter().map(|b| b.id.as_str()).collect();
        let text = format!(
            ":package: {} more jacks raised: {}",
            beads.len(),
            ids.join(", ")
        );
        let channel = self.router.resolve("").destination;
        self.post(channel, text).await
    }

    async fn decision_posted(&self, bead: &Bead) -> Result<(), NotifyError> {
        let text = format!(":ballot_box: decision needed: {} - {}", bead.id, bead.title);
        self.post(self.channel_for(bead), text).await
    }

    async fn decision_resolved(&self, bead: &Bead) -> Result<(), NotifyError> {
        let text = format!(":judge: decision resolved: {}", bead.id);
        self.post(self.channel_for(bead), text).await
    }

    async fn claimed_updated(&self, bead: &Bead, destination: &str) -> Result<(), NotifyError> {
        let text = format!("bead updated while claimed: {} - {}", bead.id, bead.title);
        self.post(destination.to_string(), text).await
    }

    async fn claimed_closed(&self, bead: &Bead, destination: &str) -> Result<(), NotifyError> {
        let text = format!("bead closed while claimed: {} - {}", bead.id, bead.title);
        self.post(destination.to_string(), text).await
    }
}
