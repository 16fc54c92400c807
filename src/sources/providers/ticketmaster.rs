// src/sources/providers/ticketmaster.rs
use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::Client;
use serde::Deserialize;

use crate::sources::types::EventEntry;
use crate::sources::{normalize_text, send_for_json, Absence, FetchContext, SourceAdapter};

pub const DEFAULT_BASE_URL: &str = "https://app.ticketmaster.com";
pub const DEFAULT_LIMIT: usize = 5;
pub const DEFAULT_RADIUS_MILES: u32 = 25;

#[derive(Debug, Deserialize)]
struct DiscoveryResponse {
    #[serde(rename = "_embedded")]
    embedded: Option<Embedded>,
}

#[derive(Debug, Deserialize)]
struct Embedded {
    #[serde(default)]
    events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
struct Event {
    name: Option<String>,
    url: Option<String>,
    dates: Option<Dates>,
    #[serde(rename = "_embedded")]
    embedded: Option<EventEmbedded>,
}

#[derive(Debug, Deserialize)]
struct Dates {
    start: Option<Start>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Start {
    local_date: Option<String>,
    local_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventEmbedded {
    #[serde(default)]
    venues: Vec<Venue>,
}

#[derive(Debug, Deserialize)]
struct Venue {
    name: Option<String>,
}

/// Ticketmaster Discovery: upcoming events near the origin, soonest first.
pub struct TicketmasterEvents {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    limit: usize,
    radius_miles: u32,
}

impl TicketmasterEvents {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            limit: DEFAULT_LIMIT,
            radius_miles: DEFAULT_RADIUS_MILES,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Clamped to 3..=5.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.clamp(3, 5);
        self
    }

    pub fn with_radius_miles(mut self, miles: u32) -> Self {
        self.radius_miles = miles;
        self
    }

    fn events_from(resp: DiscoveryResponse, limit: usize) -> Vec<EventEntry> {
        let Some(embedded) = resp.embedded else {
            // Ticketmaster omits `_embedded` entirely when nothing matches.
            return Vec::new();
        };

        embedded
            .events
            .into_iter()
            .filter_map(|e| {
                let url = e.url.filter(|u| !u.trim().is_empty())?;
                let name = normalize_text(e.name.as_deref().unwrap_or("Event"));
                let start = e.dates.and_then(|d| d.start);
                let (local_date, local_time) = match start {
                    Some(s) => (s.local_date, s.local_time),
                    None => (None, None),
                };
                let venue = e
                    .embedded
                    .and_then(|em| em.venues.into_iter().next())
                    .and_then(|v| v.name);
                Some(EventEntry {
                    name,
                    url,
                    local_date,
                    local_time,
                    venue,
                })
            })
            .take(limit)
            .collect()
    }
}

#[async_trait]
impl SourceAdapter for TicketmasterEvents {
    type Output = Vec<EventEntry>;

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<EventEntry>, Absence> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(Absence::CredentialMissing);
        };

        let url = format!(
            "{}/discovery/v2/events.json",
            self.base_url.trim_end_matches('/')
        );
        let req = self.client.get(url).query(&[
            ("apikey", key.to_string()),
            ("latlong", ctx.origin.as_query()),
            ("radius", self.radius_miles.to_string()),
            ("unit", "miles".to_string()),
            ("countryCode", "US".to_string()),
            ("size", self.limit.to_string()),
            ("sort", "date,asc".to_string()),
            (
                "startDateTime",
                ctx.now.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
        ]);

        let resp: DiscoveryResponse = send_for_json(req, ctx.budget).await?;
        Ok(Self::events_from(resp, self.limit))
    }

    fn name(&self) -> &'static str {
        "events"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_name_url_date_and_venue() {
        let resp: DiscoveryResponse = serde_json::from_str(
            r#"{"_embedded":{"events":[
                {"name":"Phillies vs Mets","url":"https://tm.test/e/1",
                 "dates":{"start":{"localDate":"2025-10-24","localTime":"19:05:00"}},
                 "_embedded":{"venues":[{"name":"Citizens Bank Park"}]}},
                {"name":"No link"},
                {"url":"https://tm.test/e/3"}
            ]}}"#,
        )
        .unwrap();
        let evs = TicketmasterEvents::events_from(resp, 5);
        assert_eq!(evs.len(), 2);
        assert_eq!(evs[0].name, "Phillies vs Mets");
        assert_eq!(evs[0].venue.as_deref(), Some("Citizens Bank Park"));
        assert_eq!(evs[0].local_time.as_deref(), Some("19:05:00"));
        assert_eq!(evs[1].name, "Event");
        assert_eq!(evs[1].local_date, None);
    }

    #[test]
    fn no_embedded_block_means_no_events() {
        let resp: DiscoveryResponse =
            serde_json::from_str(r#"{"page":{"totalElements":0}}"#).unwrap();
        assert!(TicketmasterEvents::events_from(resp, 5).is_empty());
    }

    #[test]
    fn limit_is_clamped() {
        let c = Client::new();
        assert_eq!(TicketmasterEvents::new(c.clone(), None).with_limit(10).limit, 5);
        assert_eq!(TicketmasterEvents::new(c, None).with_limit(1).limit, 3);
    }
}
