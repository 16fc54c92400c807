// tests/providers_news.rs
//
// RSS headlines adapter: feed order, cap, entity and markup cleanup.

mod common;

use std::time::Duration;

use drive_summary::sources::providers::rss::{RssHeadlines, MAX_HEADLINES};
use drive_summary::sources::{build_http_client, SourceAdapter};
use drive_summary::Absence;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::ctx;

fn client() -> reqwest::Client {
    build_http_client(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn first_three_titles_in_feed_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/rss+xml")
                .set_body_string(include_str!("fixtures/news_rss.xml")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let heads = RssHeadlines::new(client(), format!("{}/rss.xml", server.uri()))
        .fetch(&ctx())
        .await
        .unwrap();

    assert_eq!(heads.len(), MAX_HEADLINES);
    let titles: Vec<_> = heads.iter().map(|h| h.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            r#"Regional rail adds "late-night" service"#,
            "Council votes yes on bike lanes",
            "Storm cleanup continues",
        ]
    );
    assert_eq!(heads[1].link.as_deref(), Some("https://news.test/b"));
}

#[tokio::test]
async fn feed_outage_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let res = RssHeadlines::new(client(), format!("{}/rss.xml", server.uri()))
        .fetch(&ctx())
        .await;
    assert!(matches!(res, Err(Absence::ProviderUnavailable(_))));
}

#[test]
fn channel_without_items_is_empty() {
    let xml = r#"<rss version="2.0"><channel><title>Quiet</title></channel></rss>"#;
    assert!(RssHeadlines::parse_headlines(xml).unwrap().is_empty());
}
