// tests/notify_sinks.rs
//
// ntfy/Discord payloads and best-effort fan-out.

use std::collections::BTreeSet;
use std::time::Duration;

use drive_summary::notify::console::ConsoleNotifier;
use drive_summary::notify::discord::DiscordNotifier;
use drive_summary::notify::ntfy::NtfyNotifier;
use drive_summary::sources::build_http_client;
use drive_summary::traffic::Priority;
use drive_summary::{Action, Config, Notifier, NotifierMux, Report};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn report(priority: Priority) -> Report {
    Report {
        title: "🟡 +15m Busy · To Home".into(),
        priority,
        tags: BTreeSet::from(["car".to_string(), "hourglass".to_string()]),
        actions: vec![Action {
            label: "Open in Maps".into(),
            url: "https://www.google.com/maps/dir/?api=1&origin=1,2&destination=3,4&travelmode=driving"
                .into(),
        }],
        body: "🚗 40m (usual 25m)\n🌤️ Work: N/A\n📈 Markets: N/A".into(),
    }
}

fn client() -> reqwest::Client {
    build_http_client(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn ntfy_posts_json_to_server_root() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(json!({
            "topic": "DriveSummary",
            "title": "🟡 +15m Busy · To Home",
            "priority": 4,
            "tags": ["car", "hourglass"],
            "actions": [{"action": "view", "label": "Open in Maps"}]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    NtfyNotifier::new(client(), &format!("{}/", server.uri()), "DriveSummary")
        .send(&report(Priority::High))
        .await
        .unwrap();
}

#[tokio::test]
async fn discord_embed_links_first_action() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_partial_json(json!({
            "embeds": [{
                "title": "🟡 +15m Busy · To Home",
                "url": "https://www.google.com/maps/dir/?api=1&origin=1,2&destination=3,4&travelmode=driving"
            }]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    DiscordNotifier::new(client(), format!("{}/hook", server.uri()))
        .send(&report(Priority::Normal))
        .await
        .unwrap();
}

#[tokio::test]
async fn ntfy_error_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let res = NtfyNotifier::new(client(), &server.uri(), "t")
        .send(&report(Priority::Normal))
        .await;
    assert!(res.is_err());
}

#[tokio::test]
async fn mux_swallows_failing_channel_and_counts_deliveries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let channels: Vec<Box<dyn Notifier>> = vec![
        Box::new(ConsoleNotifier),
        Box::new(NtfyNotifier::new(client(), &server.uri(), "t")),
    ];
    let mux = NotifierMux::new(channels);
    assert_eq!(mux.channel_names(), vec!["console", "ntfy"]);
    assert_eq!(mux.notify(&report(Priority::Normal)).await, 1);
}

#[test]
fn dry_run_mux_only_prints() {
    let cfg = Config {
        send_notifications: false,
        discord_webhook_url: Some("https://discord.test/hook".into()),
        ..Config::default()
    };
    let mux = NotifierMux::from_config(&cfg, client());
    assert_eq!(mux.channel_names(), vec!["console"]);
}

#[test]
fn sending_mux_adds_ntfy_and_optional_discord() {
    let mut cfg = Config {
        send_notifications: true,
        ..Config::default()
    };
    assert_eq!(
        NotifierMux::from_config(&cfg, client()).channel_names(),
        vec!["console", "ntfy"]
    );

    cfg.discord_webhook_url = Some("https://discord.test/hook".into());
    assert_eq!(
        NotifierMux::from_config(&cfg, client()).channel_names(),
        vec!["console", "ntfy", "discord"]
    );
}
