// src/sources/providers/rss.rs
use async_trait::async_trait;
use once_cell::sync::Lazy;
use quick_xml::de::from_str;
use regex::{Captures, Regex};
use reqwest::Client;
use serde::Deserialize;

use crate::sources::types::Headline;
use crate::sources::{normalize_text, send_for_text, Absence, FetchContext, SourceAdapter};

pub const DEFAULT_FEED_URL: &str = "https://feeds.npr.org/1001/rss.xml";
pub const MAX_HEADLINES: usize = 3;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
}

/// First few headlines of one RSS 2.0 feed, in feed order.
pub struct RssHeadlines {
    client: Client,
    feed_url: String,
}

impl RssHeadlines {
    pub fn new(client: Client, feed_url: impl Into<String>) -> Self {
        Self {
            client,
            feed_url: feed_url.into(),
        }
    }

    pub fn parse_headlines(xml: &str) -> Result<Vec<Headline>, Absence> {
        let xml_clean = scrub_html_entities_for_xml(xml);
        let rss: Rss =
            from_str(&xml_clean).map_err(|e| Absence::MalformedResponse(format!("rss: {e}")))?;

        Ok(rss
            .channel
            .item
            .into_iter()
            .filter_map(|it| {
                let title = normalize_text(it.title.as_deref().unwrap_or_default());
                (!title.is_empty()).then(|| Headline {
                    title,
                    link: it.link.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()),
                })
            })
            .take(MAX_HEADLINES)
            .collect())
    }
}

#[async_trait]
impl SourceAdapter for RssHeadlines {
    type Output = Vec<Headline>;

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<Headline>, Absence> {
        let body = send_for_text(self.client.get(&self.feed_url), ctx.budget).await?;
        Self::parse_headlines(&body)
    }

    fn name(&self) -> &'static str {
        "news"
    }
}

static RE_NAMED_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&([A-Za-z][A-Za-z0-9]*);").expect("entity regex"));

const XML_ENTITIES: [&str; 5] = ["amp", "lt", "gt", "quot", "apos"];

/// quick-xml only knows the five XML entities; feeds routinely use HTML ones
/// anywhere in the document. Decode those to text (re-escaped for XML);
/// unknown names survive as literal text.
fn scrub_html_entities_for_xml(s: &str) -> String {
    RE_NAMED_ENTITY
        .replace_all(s, |caps: &Captures| {
            let whole = &caps[0];
            if XML_ENTITIES.contains(&&caps[1]) {
                return whole.to_string();
            }
            let decoded = html_escape::decode_html_entities(whole);
            html_escape::encode_text(&decoded).into_owned()
        })
        .into_owned()
}
