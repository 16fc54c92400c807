//! # Report Composer
//! Deterministic assembly of the notification from whatever the sources produced.
//! Absent sections are left out of the body, never rendered as errors.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::direction::RunPlan;
use crate::orchestrator::SourceBundle;
use crate::sources::types::{
    Coordinate, EventEntry, Headline, MarketLine, WeatherAlert, WeatherSnapshot,
};
use crate::traffic::{fmt_hm, DelayClassification, Priority};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub label: String,
    pub url: String,
}

/// The one artifact handed to the notification sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub title: String,
    pub priority: Priority,
    pub tags: BTreeSet<String>,
    pub actions: Vec<Action>,
    pub body: String,
}

impl Report {
    /// Title, body and action links as plain text (console output).
    pub fn render_plain(&self) -> String {
        let mut out = format!("{}\n\n{}", self.title, self.body);
        for a in &self.actions {
            out.push_str(&format!("\n\n🔗 {}: {}", a.label, a.url));
        }
        out
    }
}

/// Google Maps driving directions between two points.
pub fn navigation_url(origin: Coordinate, destination: Coordinate) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&origin={}&destination={}&travelmode=driving",
        origin.as_query(),
        destination.as_query()
    )
}

fn travel_line(c: &DelayClassification) -> String {
    format!(
        "🚗 {} (usual {})",
        fmt_hm(c.current_seconds),
        fmt_hm(c.historic_seconds)
    )
}

fn weather_line(place: &str, w: Option<&WeatherSnapshot>) -> String {
    let Some(w) = w.filter(|w| !w.is_empty()) else {
        return format!("🌤️ {place}: N/A");
    };

    let mut parts = Vec::with_capacity(4);
    if let Some(t) = w.temperature_f {
        parts.push(format!("{t:.0}°F"));
    }
    parts.push(w.condition_label().to_string());
    if let Some(mph) = w.wind_mph {
        parts.push(format!("wind {mph:.0} mph"));
    }
    if let Some(mm) = w.precipitation_mm.filter(|mm| *mm > 0.0) {
        parts.push(format!("{mm:.1} mm precip"));
    }
    format!("🌤️ {place}: {}", parts.join(", "))
}

fn alert_line(alerts: &[WeatherAlert]) -> Option<String> {
    let first = alerts.first()?;
    let mut line = format!("⚠️ Alerts: {}", first.headline);
    if alerts.len() > 1 {
        line.push_str(&format!(" (+{} more)", alerts.len() - 1));
    }
    Some(line)
}

fn market_line(lines: Option<&Vec<MarketLine>>) -> String {
    match lines.filter(|l| !l.is_empty()) {
        Some(lines) => {
            let parts: Vec<String> = lines
                .iter()
                .map(|m| format!("{} {:+.2}%", m.label, m.change_pct))
                .collect();
            format!("📈 {}", parts.join(" · "))
        }
        None => "📈 Markets: N/A".to_string(),
    }
}

fn news_section(heads: &[Headline]) -> Vec<String> {
    if heads.is_empty() {
        return Vec::new();
    }
    let mut out = vec!["📰 Headlines:".to_string()];
    out.extend(heads.iter().map(|h| format!("• {}", h.title)));
    out
}

fn events_section(events: &[EventEntry]) -> Vec<String> {
    if events.is_empty() {
        return Vec::new();
    }
    let mut out = vec!["🎟️ Events:".to_string()];
    for e in events {
        out.push(format!("• {}", e.display_name()));
        out.push(format!("  {}", e.url));
    }
    out
}

/// Build the report. Total over every present/absent combination.
pub fn compose(
    plan: &RunPlan,
    bundle: &SourceBundle,
    classification: &DelayClassification,
) -> Report {
    let mut lines = vec![
        travel_line(classification),
        weather_line(&plan.origin_place().to_string(), bundle.weather.present()),
    ];
    if let Some(alerts) = bundle.alerts.present().and_then(|a| alert_line(a)) {
        lines.push(alerts);
    }
    lines.push(market_line(bundle.market.present()));

    let mut sections: Vec<Vec<String>> = Vec::new();
    if let Some(heads) = bundle.news.present() {
        sections.push(news_section(heads));
    }
    if plan.include_events {
        if let Some(events) = bundle.events.present() {
            sections.push(events_section(events));
        }
    }
    for section in sections.into_iter().filter(|s| !s.is_empty()) {
        lines.push(String::new());
        lines.extend(section);
    }

    let title = format!(
        "{} {} · {}",
        classification.display_symbol,
        classification.title_phrase(),
        plan.direction.label()
    );

    Report {
        title,
        priority: classification.priority,
        tags: classification.tags().into_iter().map(String::from).collect(),
        actions: vec![Action {
            label: "Open in Maps".to_string(),
            url: navigation_url(plan.origin, plan.destination),
        }],
        body: lines.join("\n"),
    }
}
