// src/sources/providers/open_meteo.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::sources::types::{Condition, WeatherSnapshot};
use crate::sources::{send_for_json, Absence, FetchContext, SourceAdapter};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

const MS_TO_MPH: f64 = 2.23694;

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<Current>,
}

#[derive(Debug, Deserialize)]
struct Current {
    temperature_2m: Option<f64>,
    precipitation: Option<f64>,
    wind_speed_10m: Option<f64>,
    #[serde(alias = "weathercode")]
    weather_code: Option<i64>,
}

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

/// Open-Meteo current conditions at the run's origin. No key needed.
pub struct OpenMeteoWeather {
    client: Client,
    base_url: String,
}

impl OpenMeteoWeather {
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

    fn snapshot_from(resp: ForecastResponse) -> Result<WeatherSnapshot, Absence> {
        let cur = resp
            .current
            .ok_or_else(|| Absence::MalformedResponse("missing `current` block".into()))?;
        Ok(WeatherSnapshot {
            temperature_f: cur.temperature_2m.map(celsius_to_fahrenheit),
            condition: Condition::from_wmo(cur.weather_code),
            raw_code: cur.weather_code,
            wind_mph: cur.wind_speed_10m.map(|ms| ms * MS_TO_MPH),
            precipitation_mm: cur.precipitation,
        })
    }
}

#[async_trait]
impl SourceAdapter for OpenMeteoWeather {
    type Output = WeatherSnapshot;

    async fn fetch(&self, ctx: &FetchContext) -> Result<WeatherSnapshot, Absence> {
        let url = format!("{}/v1/forecast", self.base_url.trim_end_matches('/'));
        let req = self.client.get(url).query(&[
            ("latitude", ctx.origin.lat.to_string()),
            ("longitude", ctx.origin.lon.to_string()),
            (
                "current",
                "temperature_2m,precipitation,wind_speed_10m,weather_code".to_string(),
            ),
            ("wind_speed_unit", "ms".to_string()),
        ]);
        let resp: ForecastResponse = send_for_json(req, ctx.budget).await?;
        Self::snapshot_from(resp)
    }

    fn name(&self) -> &'static str {
        "weather"
    }
}
