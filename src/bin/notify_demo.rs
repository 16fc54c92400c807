//! Demo that pushes a few synthetic reports through the multiplexer
//! (stdout/log only unless SEND_NOTIFICATIONS is on).

use drive_summary::direction::RunPlan;
use drive_summary::report::compose;
use drive_summary::sources::build_http_client;
use drive_summary::sources::types::TravelSample;
use drive_summary::traffic::classify;
use drive_summary::{Absence, Config, NotifierMux, SourceBundle, SourceResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let cfg = Config::load(None)?;
    let client = build_http_client(cfg.request_timeout())?;
    let mux = NotifierMux::from_config(&cfg, client);

    // (hour, current, historic): clear morning, busy evening, severe evening
    let seq = [(7, 1500, 1450), (17, 2400, 1500), (18, 3600, 1500)];

    for (hour, current, historic) in seq {
        let plan = RunPlan::for_hour(hour, cfg.home, cfg.work);
        let sample = TravelSample::new(Some(current), Some(historic));
        let mut bundle = SourceBundle::all_absent(Absence::NotRequested);
        bundle.traffic = SourceResult::Present(sample);

        let report = compose(&plan, &bundle, &classify(&sample));
        mux.notify(&report).await;
        tokio::time::sleep(std::time::Duration::from_millis(400)).await;
    }

    println!("notify-demo done");
    Ok(())
}
