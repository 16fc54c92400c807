// src/sources/providers/yahoo.rs
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;

use crate::sources::types::{Instrument, MarketLine};
use crate::sources::{send_for_json, Absence, FetchContext, SourceAdapter};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Latest close and its percent change vs the preceding close.
/// `None` with fewer than two closes or a zero previous close.
pub fn latest_change(closes: &[f64]) -> Option<(f64, f64)> {
    let [.., prev, last] = closes else {
        return None;
    };
    if *prev == 0.0 {
        return None;
    }
    Some((*last, (last - prev) / prev * 100.0))
}

/// Daily closes from the Yahoo Finance chart endpoint, one call per instrument.
pub struct YahooMarket {
    client: Client,
    base_url: String,
    instruments: Vec<Instrument>,
}

impl YahooMarket {
    pub fn new(client: Client, instruments: Vec<Instrument>) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            instruments,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn closes_from(resp: ChartResponse) -> Result<Vec<f64>, Absence> {
        let result = resp
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| Absence::MalformedResponse("chart without result".into()))?;
        Ok(result
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close.into_iter().flatten().collect())
            .unwrap_or_default())
    }

    async fn fetch_line(
        &self,
        inst: &Instrument,
        budget: Duration,
    ) -> Result<Option<MarketLine>, Absence> {
        let url = format!(
            "{}/v8/finance/chart/{}",
            self.base_url.trim_end_matches('/'),
            inst.symbol
        );
        let req = self
            .client
            .get(url)
            .query(&[("range", "5d"), ("interval", "1d")]);
        let resp: ChartResponse = send_for_json(req, budget).await?;
        let closes = Self::closes_from(resp)?;

        Ok(latest_change(&closes).map(|(last_close, change_pct)| MarketLine {
            label: inst.label.clone(),
            symbol: inst.symbol.clone(),
            last_close,
            change_pct,
        }))
    }
}

#[async_trait]
impl SourceAdapter for YahooMarket {
    type Output = Vec<MarketLine>;

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<MarketLine>, Absence> {
        // One request per instrument, all in flight together so the adapter
        // stays within a single request budget.
        let results = join_all(
            self.instruments
                .iter()
                .map(|inst| self.fetch_line(inst, ctx.budget)),
        )
        .await;

        let mut lines = Vec::with_capacity(self.instruments.len());
        let mut failures = 0usize;
        let mut first_err = None;

        for (inst, result) in self.instruments.iter().zip(results) {
            match result {
                Ok(Some(line)) => lines.push(line),
                Ok(None) => {
                    tracing::debug!(symbol = %inst.symbol, "not enough closes, skipping");
                }
                Err(e) => {
                    tracing::debug!(symbol = %inst.symbol, error = %e, "instrument fetch failed");
                    failures += 1;
                    first_err.get_or_insert(e);
                }
            }
        }

        // Absent only when every instrument call failed.
        match first_err {
            Some(e) if failures == self.instruments.len() => Err(e),
            _ => Ok(lines),
        }
    }

    fn name(&self) -> &'static str {
        "market"
    }
}
