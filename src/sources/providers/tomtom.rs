// src/sources/providers/tomtom.rs
use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::Client;
use serde::Deserialize;

use crate::sources::types::TravelSample;
use crate::sources::{send_for_json, Absence, FetchContext, SourceAdapter};

pub const DEFAULT_BASE_URL: &str = "https://api.tomtom.com";

#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    summary: Option<Summary>,
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    summary: Option<Summary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    travel_time_in_seconds: Option<i64>,
    historic_traffic_travel_time_in_seconds: Option<i64>,
}

/// TomTom Routing: live travel time plus the historic baseline for the same departure.
pub struct TomTomTraffic {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl TomTomTraffic {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn sample_from(resp: RouteResponse) -> Result<TravelSample, Absence> {
        let route = resp
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| Absence::MalformedResponse("no routes in response".into()))?;

        let summary = route
            .summary
            .or_else(|| route.legs.into_iter().next().and_then(|leg| leg.summary))
            .ok_or_else(|| Absence::MalformedResponse("route without summary".into()))?;

        let current = summary.travel_time_in_seconds.filter(|s| *s > 0);
        let Some(current) = current else {
            return Err(Absence::MalformedResponse(
                "missing travelTimeInSeconds".into(),
            ));
        };

        // No separate baseline reported: use current, i.e. zero delay.
        let historic = summary
            .historic_traffic_travel_time_in_seconds
            .filter(|s| *s > 0)
            .unwrap_or(current);

        Ok(TravelSample::new(Some(current), Some(historic)))
    }
}

#[async_trait]
impl SourceAdapter for TomTomTraffic {
    type Output = TravelSample;

    async fn fetch(&self, ctx: &FetchContext) -> Result<TravelSample, Absence> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(Absence::CredentialMissing);
        };

        let url = format!(
            "{}/routing/1/calculateRoute/{}:{}/json",
            self.base_url.trim_end_matches('/'),
            ctx.origin.as_query(),
            ctx.destination.as_query()
        );
        let depart_at = ctx.now.to_rfc3339_opts(SecondsFormat::Secs, true);
        let req = self.client.get(url).query(&[
            ("key", key),
            ("traffic", "true"),
            ("routeType", "fastest"),
            ("travelMode", "car"),
            ("departAt", depart_at.as_str()),
            ("computeTravelTimeFor", "all"),
        ]);

        let resp: RouteResponse = send_for_json(req, ctx.budget).await?;
        Self::sample_from(resp)
    }

    fn name(&self) -> &'static str {
        "traffic"
    }
}
