use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::Notifier;
use crate::report::Report;
use crate::traffic::Priority;

/// Discord caps embed descriptions at 4096 characters.
const MAX_DESCRIPTION_CHARS: usize = 4096;

#[derive(Clone)]
pub struct DiscordNotifier {
    webhook: String,
    client: Client,
    timeout: Duration,
}

impl DiscordNotifier {
    pub fn new(client: Client, webhook: String) -> Self {
        Self {
            webhook,
            client,
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

#[async_trait::async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, report: &Report) -> Result<()> {
        let payload = DiscordWebhookPayload::from_report(report);

        self.client
            .post(&self.webhook)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .context("discord webhook request failed")?
            .error_for_status()
            .context("discord webhook HTTP error")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "discord"
    }
}

#[derive(Serialize)]
struct DiscordEmbed {
    title: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    color: u32,
}

#[derive(Serialize)]
struct DiscordWebhookPayload {
    content: Option<String>,
    embeds: Vec<DiscordEmbed>,
}

impl DiscordWebhookPayload {
    fn from_report(report: &Report) -> Self {
        let color = match report.priority {
            Priority::High => 0xE74C3C,
            Priority::Normal => 0x2ECC71,
        };
        Self {
            content: None,
            embeds: vec![DiscordEmbed {
                title: report.title.clone(),
                description: report.body.chars().take(MAX_DESCRIPTION_CHARS).collect(),
                url: report.actions.first().map(|a| a.url.clone()),
                color,
            }],
        }
    }
}
