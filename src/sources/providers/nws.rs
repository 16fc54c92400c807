// src/sources/providers/nws.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::sources::types::WeatherAlert;
use crate::sources::{normalize_text, send_for_json, Absence, FetchContext, SourceAdapter};

pub const DEFAULT_BASE_URL: &str = "https://api.weather.gov";
pub const MAX_ALERTS: usize = 3;

#[derive(Debug, Deserialize)]
struct AlertCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Option<Properties>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    headline: Option<String>,
    event: Option<String>,
}

/// National Weather Service active alerts for the origin point (US only).
pub struct NwsAlerts {
    client: Client,
    base_url: String,
}

impl NwsAlerts {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn alerts_from(resp: AlertCollection) -> Vec<WeatherAlert> {
        resp.features
            .into_iter()
            .filter_map(|f| f.properties)
            .filter_map(|p| p.headline.or(p.event))
            .map(|h| normalize_text(&h))
            .filter(|h| !h.is_empty())
            .take(MAX_ALERTS)
            .map(|headline| WeatherAlert { headline })
            .collect()
    }
}

#[async_trait]
impl SourceAdapter for NwsAlerts {
    type Output = Vec<WeatherAlert>;

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<WeatherAlert>, Absence> {
        let url = format!("{}/alerts/active", self.base_url.trim_end_matches('/'));
        // NWS rejects points with more than four decimals.
        let point = format!("{:.4},{:.4}", ctx.origin.lat, ctx.origin.lon);
        let req = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/geo+json")
            .query(&[("point", point.as_str()), ("status", "actual")]);
        let resp: AlertCollection = send_for_json(req, ctx.budget).await?;
        Ok(Self::alerts_from(resp))
    }

    fn name(&self) -> &'static str {
        "alerts"
    }
}
