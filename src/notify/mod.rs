// src/notify/mod.rs
pub mod console;
pub mod discord;
pub mod ntfy;

use anyhow::Result;

use crate::config::Config;
use crate::report::Report;

use self::{console::ConsoleNotifier, discord::DiscordNotifier, ntfy::NtfyNotifier};

/// A delivery channel for a finished report.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, report: &Report) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Fans a report out to every enabled channel. Best effort: a failing
/// channel is logged and skipped, never retried, never surfaced.
pub struct NotifierMux {
    channels: Vec<Box<dyn Notifier>>,
}

impl NotifierMux {
    pub fn new(channels: Vec<Box<dyn Notifier>>) -> Self {
        Self { channels }
    }

    /// Console always; ntfy (and Discord when configured) only when sending is on.
    pub fn from_config(cfg: &Config, client: reqwest::Client) -> Self {
        let mut channels: Vec<Box<dyn Notifier>> = vec![Box::new(ConsoleNotifier)];
        if cfg.send_notifications {
            channels.push(Box::new(
                NtfyNotifier::new(client.clone(), &cfg.ntfy_server, &cfg.ntfy_topic)
                    .with_timeout(cfg.request_timeout_secs),
            ));
            if let Some(url) = &cfg.discord_webhook_url {
                channels.push(Box::new(
                    DiscordNotifier::new(client, url.clone())
                        .with_timeout(cfg.request_timeout_secs),
                ));
            }
        } else {
            tracing::info!("dry run: notifications disabled (SEND_NOTIFICATIONS)");
        }
        Self { channels }
    }

    pub fn channel_names(&self) -> Vec<&'static str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Returns how many channels accepted the report.
    pub async fn notify(&self, report: &Report) -> usize {
        let mut delivered = 0;
        for ch in &self.channels {
            match ch.send(report).await {
                Ok(()) => {
                    delivered += 1;
                    tracing::debug!(channel = ch.name(), "report delivered");
                }
                Err(e) => {
                    metrics::counter!("notify_failures_total", "channel" => ch.name())
                        .increment(1);
                    tracing::warn!(channel = ch.name(), error = %format!("{e:#}"), "could not send notification");
                }
            }
        }
        delivered
    }
}
