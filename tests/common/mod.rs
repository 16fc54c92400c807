// tests/common/mod.rs
// Fake adapters shared by the orchestrator/pipeline tests.
#![allow(dead_code)]

use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use drive_summary::orchestrator::AdapterSet;
use drive_summary::sources::types::{
    Condition, Coordinate, EventEntry, Headline, MarketLine, Place, TravelSample, WeatherAlert,
    WeatherSnapshot,
};
use drive_summary::sources::{Absence, FetchContext, SourceAdapter};

pub const HOME: Coordinate = Coordinate::new(39.9790488, -75.1848477);
pub const WORK: Coordinate = Coordinate::new(39.68002035, -75.69237944);

pub fn ctx() -> FetchContext {
    FetchContext {
        origin: HOME,
        destination: WORK,
        origin_place: Place::Home,
        now: Utc.with_ymd_and_hms(2025, 10, 20, 11, 45, 0).unwrap(),
        budget: Duration::from_secs(5),
    }
}

/// Returns a clone of a fixed value; counts invocations.
pub struct Fixed<T> {
    value: T,
    name: &'static str,
    pub calls: Arc<AtomicUsize>,
}

impl<T> Fixed<T> {
    pub fn new(name: &'static str, value: T) -> Self {
        Self {
            value,
            name,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> SourceAdapter for Fixed<T> {
    type Output = T;

    async fn fetch(&self, _ctx: &FetchContext) -> Result<T, Absence> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.value.clone())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Always absent with the given reason.
pub struct Failing<T> {
    absence: Absence,
    name: &'static str,
    _out: PhantomData<fn() -> T>,
}

impl<T> Failing<T> {
    pub fn new(name: &'static str, absence: Absence) -> Self {
        Self {
            absence,
            name,
            _out: PhantomData,
        }
    }
}

#[async_trait]
impl<T: Send + 'static> SourceAdapter for Failing<T> {
    type Output = T;

    async fn fetch(&self, _ctx: &FetchContext) -> Result<T, Absence> {
        Err(self.absence.clone())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Sleeps for `delay` before answering.
pub struct Slow<T> {
    value: T,
    delay: Duration,
    name: &'static str,
}

impl<T> Slow<T> {
    pub fn new(name: &'static str, value: T, delay: Duration) -> Self {
        Self { value, delay, name }
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> SourceAdapter for Slow<T> {
    type Output = T;

    async fn fetch(&self, _ctx: &FetchContext) -> Result<T, Absence> {
        tokio::time::sleep(self.delay).await;
        Ok(self.value.clone())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Panics inside the adapter task.
pub struct Panicking<T> {
    _out: PhantomData<fn() -> T>,
}

impl<T> Panicking<T> {
    pub fn new() -> Self {
        Self { _out: PhantomData }
    }
}

#[async_trait]
impl<T: Send + 'static> SourceAdapter for Panicking<T> {
    type Output = T;

    async fn fetch(&self, _ctx: &FetchContext) -> Result<T, Absence> {
        panic!("adapter exploded");
    }

    fn name(&self) -> &'static str {
        "panicking"
    }
}

pub fn sample_weather() -> WeatherSnapshot {
    WeatherSnapshot {
        temperature_f: Some(61.0),
        condition: Condition::Cloudy,
        raw_code: Some(3),
        wind_mph: Some(9.0),
        precipitation_mm: Some(0.0),
    }
}

pub fn sample_market() -> Vec<MarketLine> {
    vec![
        MarketLine {
            label: "S&P 500".into(),
            symbol: "^GSPC".into(),
            last_close: 5021.5,
            change_pct: 0.42,
        },
        MarketLine {
            label: "Nasdaq".into(),
            symbol: "^IXIC".into(),
            last_close: 15990.0,
            change_pct: -0.1,
        },
    ]
}

pub fn sample_headlines() -> Vec<Headline> {
    vec![
        Headline {
            title: "Transit strike averted".into(),
            link: Some("https://news.test/1".into()),
        },
        Headline {
            title: "Bridge repairs begin Monday".into(),
            link: None,
        },
    ]
}

pub fn sample_events() -> Vec<EventEntry> {
    vec![EventEntry {
        name: "Phillies vs Mets".into(),
        url: "https://tm.test/e/1".into(),
        local_date: Some("2025-10-20".into()),
        local_time: Some("19:05:00".into()),
        venue: Some("Citizens Bank Park".into()),
    }]
}

/// Every adapter present, travel time as given.
pub fn all_present(current: i64, historic: i64) -> AdapterSet {
    AdapterSet {
        traffic: Arc::new(Fixed::new(
            "traffic",
            TravelSample::new(Some(current), Some(historic)),
        )),
        weather: Arc::new(Fixed::new("weather", sample_weather())),
        alerts: Arc::new(Fixed::new(
            "alerts",
            vec![WeatherAlert {
                headline: "Wind Advisory until 6 PM".into(),
            }],
        )),
        market: Arc::new(Fixed::new("market", sample_market())),
        news: Arc::new(Fixed::new("news", sample_headlines())),
        events: Arc::new(Fixed::new("events", sample_events())),
    }
}

/// Every adapter failing.
pub fn all_failing() -> AdapterSet {
    let down = || Absence::ProviderUnavailable("connection refused".into());
    AdapterSet {
        traffic: Arc::new(Failing::<TravelSample>::new("traffic", down())),
        weather: Arc::new(Failing::<WeatherSnapshot>::new("weather", down())),
        alerts: Arc::new(Failing::<Vec<WeatherAlert>>::new("alerts", down())),
        market: Arc::new(Failing::<Vec<MarketLine>>::new("market", down())),
        news: Arc::new(Failing::<Vec<Headline>>::new("news", down())),
        events: Arc::new(Failing::<Vec<EventEntry>>::new(
            "events",
            Absence::CredentialMissing,
        )),
    }
}
