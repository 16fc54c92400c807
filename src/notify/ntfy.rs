// src/notify/ntfy.rs
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::Notifier;
use crate::report::Report;

/// Publishes to an ntfy topic using the JSON publish API (POST to the server root).
pub struct NtfyNotifier {
    server: String,
    topic: String,
    client: Client,
    timeout: Duration,
}

impl NtfyNotifier {
    pub fn new(client: Client, server: &str, topic: &str) -> Self {
        Self {
            server: server.trim_end_matches('/').to_string(),
            topic: topic.to_string(),
            client,
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

#[derive(Serialize)]
struct NtfyAction<'a> {
    action: &'static str,
    label: &'a str,
    url: &'a str,
}

#[derive(Serialize)]
struct NtfyMessage<'a> {
    topic: &'a str,
    title: &'a str,
    message: &'a str,
    priority: u8,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    actions: Vec<NtfyAction<'a>>,
}

impl<'a> NtfyMessage<'a> {
    fn from_report(topic: &'a str, report: &'a Report) -> Self {
        Self {
            topic,
            title: &report.title,
            message: &report.body,
            priority: report.priority.ntfy_level(),
            tags: report.tags.iter().map(String::as_str).collect(),
            // ntfy shows at most three action buttons
            actions: report
                .actions
                .iter()
                .take(3)
                .map(|a| NtfyAction {
                    action: "view",
                    label: &a.label,
                    url: &a.url,
                })
                .collect(),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for NtfyNotifier {
    async fn send(&self, report: &Report) -> Result<()> {
        let body = NtfyMessage::from_report(&self.topic, report);

        self.client
            .post(&self.server)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .context("ntfy post")?
            .error_for_status()
            .context("ntfy non-2xx")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ntfy"
    }
}
