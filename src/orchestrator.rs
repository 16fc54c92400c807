// src/orchestrator.rs
//! Fan-out/fan-in over the source adapters. Every adapter runs in its own task
//! under its own timeout; the join waits for all of them and never fails.

use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;

use crate::config::Config;
use crate::sources::providers::{
    nws::NwsAlerts, open_meteo::OpenMeteoWeather, rss::RssHeadlines,
    ticketmaster::TicketmasterEvents, tomtom::TomTomTraffic, yahoo::YahooMarket,
};
use crate::sources::types::{
    EventEntry, Headline, MarketLine, TravelSample, WeatherAlert, WeatherSnapshot,
};
use crate::sources::{Absence, FetchContext, SourceAdapter, SourceResult};

pub type DynAdapter<T> = Arc<dyn SourceAdapter<Output = T>>;

/// One-time metrics registration (so series show up in the textfile).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "adapter_fetch_total",
            "Adapter invocations by adapter and outcome."
        );
        describe_histogram!("adapter_fetch_ms", "Adapter wall time in milliseconds.");
    });
}

/// Every adapter a run may use.
#[derive(Clone)]
pub struct AdapterSet {
    pub traffic: DynAdapter<TravelSample>,
    pub weather: DynAdapter<WeatherSnapshot>,
    pub alerts: DynAdapter<Vec<WeatherAlert>>,
    pub market: DynAdapter<Vec<MarketLine>>,
    pub news: DynAdapter<Vec<Headline>>,
    pub events: DynAdapter<Vec<EventEntry>>,
}

impl AdapterSet {
    /// Production adapters wired from configuration, sharing one HTTP client.
    pub fn from_config(cfg: &Config, client: reqwest::Client) -> Self {
        Self {
            traffic: Arc::new(TomTomTraffic::new(
                client.clone(),
                cfg.tomtom_api_key.clone(),
            )),
            weather: Arc::new(OpenMeteoWeather::new(client.clone())),
            alerts: Arc::new(NwsAlerts::new(client.clone())),
            market: Arc::new(YahooMarket::new(client.clone(), cfg.instruments.clone())),
            news: Arc::new(RssHeadlines::new(client.clone(), cfg.news_feed_url.clone())),
            events: Arc::new(
                TicketmasterEvents::new(client, cfg.ticketmaster_api_key.clone())
                    .with_limit(cfg.events_limit)
                    .with_radius_miles(cfg.events_radius_miles),
            ),
        }
    }
}

/// Terminal outcome of every adapter for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceBundle {
    pub traffic: SourceResult<TravelSample>,
    pub weather: SourceResult<WeatherSnapshot>,
    pub alerts: SourceResult<Vec<WeatherAlert>>,
    pub market: SourceResult<Vec<MarketLine>>,
    pub news: SourceResult<Vec<Headline>>,
    pub events: SourceResult<Vec<EventEntry>>,
}

impl SourceBundle {
    /// Every source absent for the same reason.
    pub fn all_absent(reason: Absence) -> Self {
        Self {
            traffic: SourceResult::Absent(reason.clone()),
            weather: SourceResult::Absent(reason.clone()),
            alerts: SourceResult::Absent(reason.clone()),
            market: SourceResult::Absent(reason.clone()),
            news: SourceResult::Absent(reason.clone()),
            events: SourceResult::Absent(reason),
        }
    }

    pub fn present_count(&self) -> usize {
        [
            self.traffic.is_present(),
            self.weather.is_present(),
            self.alerts.is_present(),
            self.market.is_present(),
            self.news.is_present(),
            self.events.is_present(),
        ]
        .into_iter()
        .filter(|p| *p)
        .count()
    }

    /// `(adapter, absence)` for every source that produced nothing.
    pub fn absences(&self) -> Vec<(&'static str, &Absence)> {
        [
            ("traffic", self.traffic.absence()),
            ("weather", self.weather.absence()),
            ("alerts", self.alerts.absence()),
            ("market", self.market.absence()),
            ("news", self.news.absence()),
            ("events", self.events.absence()),
        ]
        .into_iter()
        .filter_map(|(name, a)| a.map(|a| (name, a)))
        .collect()
    }
}

/// Run one adapter in its own task, bounded by `limit`.
/// On timeout the task is detached and whatever it returns later is dropped.
async fn run_bounded<T: Send + 'static>(
    adapter: DynAdapter<T>,
    ctx: FetchContext,
    limit: Duration,
) -> SourceResult<T> {
    let name = adapter.name();
    let t0 = Instant::now();

    let ctx = FetchContext {
        budget: limit,
        ..ctx
    };
    let handle = tokio::spawn(async move { adapter.fetch(&ctx).await });
    let outcome = match tokio::time::timeout(limit, handle).await {
        Ok(Ok(result)) => SourceResult::from(result),
        Ok(Err(join_err)) => {
            SourceResult::Absent(Absence::ProviderUnavailable(format!(
                "adapter task failed: {join_err}"
            )))
        }
        Err(_) => SourceResult::Absent(Absence::TimedOut(limit)),
    };

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("adapter_fetch_ms", "adapter" => name).record(ms);
    match &outcome {
        SourceResult::Present(_) => {
            tracing::debug!(adapter = name, elapsed_ms = ms as u64, "source present");
            counter!("adapter_fetch_total", "adapter" => name, "outcome" => "present")
                .increment(1);
        }
        SourceResult::Absent(reason) => {
            if reason.is_failure() {
                tracing::warn!(adapter = name, elapsed_ms = ms as u64, reason = %reason, "source absent");
            } else {
                tracing::info!(adapter = name, reason = %reason, "source skipped");
            }
            counter!("adapter_fetch_total", "adapter" => name, "outcome" => reason.kind())
                .increment(1);
        }
    }
    outcome
}

/// Invoke every adapter the run needs concurrently and wait for all of them.
/// Events are only fetched when `include_events` is set.
pub async fn fetch_all(
    adapters: &AdapterSet,
    ctx: &FetchContext,
    include_events: bool,
    limit: Duration,
) -> SourceBundle {
    ensure_metrics_described();
    let t0 = Instant::now();

    let events = async {
        if include_events {
            run_bounded(adapters.events.clone(), ctx.clone(), limit).await
        } else {
            SourceResult::Absent(Absence::NotRequested)
        }
    };

    let (traffic, weather, alerts, market, news, events) = tokio::join!(
        run_bounded(adapters.traffic.clone(), ctx.clone(), limit),
        run_bounded(adapters.weather.clone(), ctx.clone(), limit),
        run_bounded(adapters.alerts.clone(), ctx.clone(), limit),
        run_bounded(adapters.market.clone(), ctx.clone(), limit),
        run_bounded(adapters.news.clone(), ctx.clone(), limit),
        events,
    );

    let bundle = SourceBundle {
        traffic,
        weather,
        alerts,
        market,
        news,
        events,
    };
    tracing::info!(
        present = bundle.present_count(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "fetch barrier reached"
    );
    bundle
}
