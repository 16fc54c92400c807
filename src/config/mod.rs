// src/config/mod.rs
pub mod env;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::sources::providers::{rss, ticketmaster};
use crate::sources::types::{Coordinate, Instrument};

pub const ENV_CONFIG_PATH: &str = "DRIVE_SUMMARY_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/drive_summary.toml";

pub const DEFAULT_HOME: Coordinate = Coordinate::new(39.9790488, -75.1848477);
pub const DEFAULT_WORK: Coordinate = Coordinate::new(39.68002035, -75.69237944);

/// Tracked instruments; the market line shows exactly two.
const INSTRUMENT_COUNT: usize = 2;

/// Everything a run needs. Built once at startup, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub home: Coordinate,
    pub work: Coordinate,
    pub tomtom_api_key: Option<String>,
    pub ticketmaster_api_key: Option<String>,
    pub ntfy_server: String,
    pub ntfy_topic: String,
    /// Off by default: print only.
    pub send_notifications: bool,
    pub discord_webhook_url: Option<String>,
    pub request_timeout_secs: u64,
    pub news_feed_url: String,
    pub instruments: Vec<Instrument>,
    pub events_limit: usize,
    pub events_radius_miles: u32,
    /// Prometheus textfile written after each run, when set.
    pub metrics_textfile: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            home: DEFAULT_HOME,
            work: DEFAULT_WORK,
            tomtom_api_key: None,
            ticketmaster_api_key: None,
            ntfy_server: "https://ntfy.sh".to_string(),
            ntfy_topic: "DriveSummary".to_string(),
            send_notifications: false,
            discord_webhook_url: None,
            request_timeout_secs: 15,
            news_feed_url: rss::DEFAULT_FEED_URL.to_string(),
            instruments: vec![
                Instrument::new("S&P 500", "^GSPC"),
                Instrument::new("Nasdaq", "^IXIC"),
            ],
            events_limit: ticketmaster::DEFAULT_LIMIT,
            events_radius_miles: ticketmaster::DEFAULT_RADIUS_MILES,
            metrics_textfile: None,
        }
    }
}

impl Config {
    /// Parse a TOML file. Missing keys keep their defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Resolve the config file, apply environment overrides, validate.
    ///
    /// File lookup:
    /// 1) `explicit` (e.g. `--config`)
    /// 2) $DRIVE_SUMMARY_CONFIG
    /// 3) config/drive_summary.toml
    /// 4) built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let base = match explicit {
            Some(p) => Self::load_from_file(p)?,
            None => Self::load_file_default()?,
        };
        base.with_overrides(|key| std::env::var(key).ok())?
            .validated()
    }

    fn load_file_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            return Self::load_from_file(&pb);
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from_file(&default_p);
        }
        Ok(Self::default())
    }

    /// Check ranges and tidy up optional values.
    pub fn validated(mut self) -> Result<Self> {
        for (name, c) in [("home", self.home), ("work", self.work)] {
            if !(-90.0..=90.0).contains(&c.lat) || !(-180.0..=180.0).contains(&c.lon) {
                bail!("{name} coordinate out of range: {},{}", c.lat, c.lon);
            }
        }
        if !(1..=60).contains(&self.request_timeout_secs) {
            bail!(
                "request_timeout_secs must be within 1..=60, got {}",
                self.request_timeout_secs
            );
        }
        if self.ntfy_topic.trim().is_empty() {
            bail!("ntfy_topic must not be empty");
        }
        if self.instruments.len() > INSTRUMENT_COUNT {
            tracing::warn!(
                configured = self.instruments.len(),
                "only the first {INSTRUMENT_COUNT} instruments are tracked"
            );
            self.instruments.truncate(INSTRUMENT_COUNT);
        }

        // Empty keys behave like missing keys.
        for key in [
            &mut self.tomtom_api_key,
            &mut self.ticketmaster_api_key,
            &mut self.discord_webhook_url,
        ] {
            if key.as_deref().is_some_and(|k| k.trim().is_empty()) {
                *key = None;
            }
        }
        self.events_limit = self.events_limit.clamp(3, 5);
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
