// src/sources/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// A (latitude, longitude) pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `lat,lon` as most providers take it in a query string.
    pub fn as_query(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }
}

/// The two named places a commute runs between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Place {
    Home,
    Work,
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Home => f.write_str("Home"),
            Place::Work => f.write_str("Work"),
        }
    }
}

/// Current vs historic travel time for one route, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelSample {
    pub current_seconds: Option<i64>,
    pub historic_seconds: Option<i64>,
}

impl TravelSample {
    pub fn new(current_seconds: Option<i64>, historic_seconds: Option<i64>) -> Self {
        Self {
            current_seconds,
            historic_seconds,
        }
    }

    /// Both durations, or `None` when the sample is unusable.
    /// A current-only sample uses current as its own baseline (zero delay);
    /// a historic-only sample counts as absent.
    pub fn normalized(&self) -> Option<(i64, i64)> {
        match (self.current_seconds, self.historic_seconds) {
            (Some(cur), Some(hist)) => Some((cur, hist)),
            (Some(cur), None) => Some((cur, cur)),
            _ => None,
        }
    }
}

/// Closed set of weather conditions shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Condition {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Storm,
    #[default]
    Unknown,
}

impl Condition {
    /// Map a WMO weather interpretation code.
    pub fn from_wmo(code: Option<i64>) -> Self {
        match code {
            Some(0 | 1) => Condition::Clear,
            Some(2 | 3 | 45 | 48) => Condition::Cloudy,
            Some(51..=67 | 80..=82) => Condition::Rain,
            Some(71..=77 | 85 | 86) => Condition::Snow,
            Some(95..=99) => Condition::Storm,
            _ => Condition::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Condition::Clear => "Clear",
            Condition::Cloudy => "Cloudy",
            Condition::Rain => "Rain",
            Condition::Snow => "Snow",
            Condition::Storm => "Storm",
            Condition::Unknown => "—",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_f: Option<f64>,
    pub condition: Condition,
    pub raw_code: Option<i64>,
    pub wind_mph: Option<f64>,
    pub precipitation_mm: Option<f64>,
}

impl WeatherSnapshot {
    pub fn condition_label(&self) -> &'static str {
        self.condition.label()
    }

    /// True when the provider answered but told us nothing we can show.
    pub fn is_empty(&self) -> bool {
        self.temperature_f.is_none()
            && self.condition == Condition::Unknown
            && self.wind_mph.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub headline: String,
}

/// A tracked market instrument (display label + provider symbol).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub label: String,
    pub symbol: String,
}

impl Instrument {
    pub fn new(label: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            symbol: symbol.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketLine {
    pub label: String,
    pub symbol: String,
    pub last_close: f64,
    /// Percent change of the latest close vs the preceding one.
    pub change_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEntry {
    pub name: String,
    pub url: String,
    pub local_date: Option<String>,
    pub local_time: Option<String>,
    pub venue: Option<String>,
}

impl EventEntry {
    /// `2025-10-24 19:30:00 — Name @ Venue`, skipping whatever is missing.
    pub fn display_name(&self) -> String {
        let when: Vec<&str> = [self.local_date.as_deref(), self.local_time.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        let mut out = if when.is_empty() {
            self.name.clone()
        } else {
            format!("{} — {}", when.join(" "), self.name)
        };
        if let Some(venue) = self.venue.as_deref().filter(|v| !v.is_empty()) {
            out.push_str(" @ ");
            out.push_str(venue);
        }
        out
    }
}
