//! drive-summary: binary entrypoint
//! Loads configuration, runs the pipeline once, prints the report and forwards
//! it to the enabled sinks. Meant to be triggered by cron or a CI schedule.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use drive_summary::metrics::Metrics;
use drive_summary::sources::build_http_client;
use drive_summary::{produce_report, produce_report_at, AdapterSet, Config, NotifierMux};

#[derive(Debug, Parser)]
#[command(name = "drive-summary", version, about = "Commute, weather, market and news digest")]
struct Cli {
    /// Send notifications even if SEND_NOTIFICATIONS is off.
    #[arg(long, conflicts_with = "dry_run")]
    send: bool,

    /// Print only, never send.
    #[arg(long)]
    dry_run: bool,

    /// Pretend the local hour is this (picks the commute direction).
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    hour: Option<u32>,

    /// TOML config file (defaults to $DRIVE_SUMMARY_CONFIG or config/drive_summary.toml).
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Compact logs by default, JSON lines with LOG_FORMAT=json.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("drive_summary=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let mut cfg = Config::load(cli.config.as_deref())?;
    if cli.send {
        cfg.send_notifications = true;
    }
    if cli.dry_run {
        cfg.send_notifications = false;
    }

    let metrics = match &cfg.metrics_textfile {
        Some(_) => Some(Metrics::install()?),
        None => None,
    };

    let client = build_http_client(cfg.request_timeout())?;
    let adapters = AdapterSet::from_config(&cfg, client.clone());

    let report = match cli.hour {
        Some(hour) => produce_report_at(&cfg, &adapters, Utc::now(), hour).await,
        None => produce_report(&cfg, &adapters).await,
    };

    let mux = NotifierMux::from_config(&cfg, client);
    let delivered = mux.notify(&report).await;
    tracing::info!(delivered, channels = ?mux.channel_names(), "run finished");

    if let (Some(m), Some(path)) = (metrics, cfg.metrics_textfile.as_deref()) {
        if let Err(e) = m.write_textfile(path) {
            tracing::warn!(error = %format!("{e:#}"), "could not write metrics textfile");
        }
    }

    Ok(())
}
