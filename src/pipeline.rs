// src/pipeline.rs
use chrono::{DateTime, Local, Timelike, Utc};
use tracing::info;

use crate::config::Config;
use crate::direction::RunPlan;
use crate::orchestrator::{fetch_all, AdapterSet};
use crate::report::{compose, Report};
use crate::sources::types::TravelSample;
use crate::sources::FetchContext;
use crate::traffic::classify;

/// Produce the report for the current local time.
pub async fn produce_report(cfg: &Config, adapters: &AdapterSet) -> Report {
    let now = Local::now();
    produce_report_at(cfg, adapters, now.with_timezone(&Utc), now.hour()).await
}

/// Produce the report for an explicit instant and local hour. Never fails:
/// with every source absent the report still carries N/A lines and a map link.
pub async fn produce_report_at(
    cfg: &Config,
    adapters: &AdapterSet,
    now: DateTime<Utc>,
    local_hour: u32,
) -> Report {
    let plan = RunPlan::for_hour(local_hour, cfg.home, cfg.work);
    info!(
        direction = plan.direction.label(),
        hour = local_hour,
        events = plan.include_events,
        "starting run"
    );

    let ctx = FetchContext {
        origin: plan.origin,
        destination: plan.destination,
        origin_place: plan.origin_place(),
        now,
        budget: cfg.request_timeout(),
    };
    let bundle = fetch_all(adapters, &ctx, plan.include_events, cfg.request_timeout()).await;

    let sample = bundle.traffic.present().copied().unwrap_or_default();
    let classification = classify(&sample);
    if sample == TravelSample::default() {
        info!("no travel time this run; classification defaults to clear");
    }

    let report = compose(&plan, &bundle, &classification);
    metrics::counter!("report_composed_total", "priority" => report.priority.as_str())
        .increment(1);
    info!(
        title = %report.title,
        priority = report.priority.as_str(),
        present = bundle.present_count(),
        "report composed"
    );
    report
}
