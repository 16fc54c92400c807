// src/config/env.rs
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;

use super::Config;

/// `1`, `true`, `yes`, `on` (any case) count as enabled.
pub fn parse_flag(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_num<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key}={raw:?} is not a valid number"))
}

impl Config {
    /// Apply environment-style overrides from `lookup`.
    /// Unset or empty variables leave the current value alone.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("HOME_LAT") {
            self.home.lat = parse_num("HOME_LAT", &v)?;
        }
        if let Some(v) = get("HOME_LON") {
            self.home.lon = parse_num("HOME_LON", &v)?;
        }
        if let Some(v) = get("WORK_LAT") {
            self.work.lat = parse_num("WORK_LAT", &v)?;
        }
        if let Some(v) = get("WORK_LON") {
            self.work.lon = parse_num("WORK_LON", &v)?;
        }
        if let Some(v) = get("TOMTOM_API_KEY") {
            self.tomtom_api_key = Some(v);
        }
        if let Some(v) = get("TICKETMASTER_API_KEY") {
            self.ticketmaster_api_key = Some(v);
        }
        if let Some(v) = get("NTFY_SERVER") {
            self.ntfy_server = v;
        }
        if let Some(v) = get("NTFY_TOPIC") {
            self.ntfy_topic = v;
        }
        if let Some(v) = get("SEND_NOTIFICATIONS") {
            self.send_notifications = parse_flag(&v);
        }
        if let Some(v) = get("DISCORD_WEBHOOK_URL") {
            self.discord_webhook_url = Some(v);
        }
        if let Some(v) = get("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_num("REQUEST_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = get("NEWS_FEED_URL") {
            self.news_feed_url = v;
        }
        if let Some(v) = get("METRICS_TEXTFILE") {
            self.metrics_textfile = Some(PathBuf::from(v));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn flags_accept_common_spellings() {
        for v in ["1", "true", "YES", " on "] {
            assert!(parse_flag(v), "{v}");
        }
        for v in ["0", "false", "off", "nope", ""] {
            assert!(!parse_flag(v), "{v}");
        }
    }

    #[test]
    fn overrides_replace_values() {
        let cfg = Config::default()
            .with_overrides(lookup(&[
                ("HOME_LAT", "40.5"),
                ("WORK_LON", "-74.25"),
                ("TOMTOM_API_KEY", "tt-key"),
                ("SEND_NOTIFICATIONS", "true"),
                ("NTFY_TOPIC", "Commute"),
                ("REQUEST_TIMEOUT_SECS", "10"),
                ("TICKETMASTER_API_KEY", ""),
            ]))
            .unwrap();
        assert_eq!(cfg.home.lat, 40.5);
        assert_eq!(cfg.work.lon, -74.25);
        assert_eq!(cfg.tomtom_api_key.as_deref(), Some("tt-key"));
        assert_eq!(cfg.ticketmaster_api_key, None);
        assert!(cfg.send_notifications);
        assert_eq!(cfg.ntfy_topic, "Commute");
        assert_eq!(cfg.request_timeout_secs, 10);
    }

    #[test]
    fn bad_number_is_an_error() {
        let err = Config::default()
            .with_overrides(lookup(&[("HOME_LAT", "north")]))
            .unwrap_err();
        assert!(format!("{err:#}").contains("HOME_LAT"));
    }
}
