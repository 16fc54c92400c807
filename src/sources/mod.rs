// src/sources/mod.rs
pub mod providers;
pub mod types;

use std::time::Duration;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::sources::types::{Coordinate, Place};

/// Sent with every provider call; NWS rejects anonymous clients.
pub const USER_AGENT: &str = concat!("drive-summary/", env!("CARGO_PKG_VERSION"));

/// Why a source produced no data. Adapters return this instead of failing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Absence {
    /// Network error or non-2xx status.
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// The adapter did not finish within its time budget.
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// No key configured for this provider (configuration, not a failure).
    #[error("no credential configured")]
    CredentialMissing,
    /// The run plan did not ask for this source.
    #[error("not requested for this run")]
    NotRequested,
}

impl Absence {
    /// Short stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Absence::ProviderUnavailable(_) => "unavailable",
            Absence::TimedOut(_) => "timeout",
            Absence::MalformedResponse(_) => "malformed",
            Absence::CredentialMissing => "no_credential",
            Absence::NotRequested => "not_requested",
        }
    }

    /// Whether this absence reflects a failed call rather than configuration or policy.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Absence::ProviderUnavailable(_) | Absence::TimedOut(_) | Absence::MalformedResponse(_)
        )
    }

    /// Classify a transport error for a request bounded by `budget`.
    pub fn from_http(e: reqwest::Error, budget: Duration) -> Self {
        if e.is_timeout() {
            Absence::TimedOut(budget)
        } else if e.is_decode() {
            Absence::MalformedResponse(e.to_string())
        } else {
            Absence::ProviderUnavailable(e.to_string())
        }
    }
}

/// Outcome of one adapter invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceResult<T> {
    Present(T),
    Absent(Absence),
}

impl<T> SourceResult<T> {
    pub fn present(&self) -> Option<&T> {
        match self {
            SourceResult::Present(v) => Some(v),
            SourceResult::Absent(_) => None,
        }
    }

    pub fn absence(&self) -> Option<&Absence> {
        match self {
            SourceResult::Present(_) => None,
            SourceResult::Absent(a) => Some(a),
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, SourceResult::Present(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            SourceResult::Present(v) => Some(v),
            SourceResult::Absent(_) => None,
        }
    }
}

impl<T> From<Result<T, Absence>> for SourceResult<T> {
    fn from(r: Result<T, Absence>) -> Self {
        match r {
            Ok(v) => SourceResult::Present(v),
            Err(a) => SourceResult::Absent(a),
        }
    }
}

/// Read-only inputs shared by every adapter in one run.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchContext {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub origin_place: Place,
    pub now: DateTime<Utc>,
    /// Time budget of one adapter; the orchestrator sets it to its own limit.
    pub budget: Duration,
}

/// One external provider, normalized.
#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    type Output: Send + 'static;

    async fn fetch(&self, ctx: &FetchContext) -> Result<Self::Output, Absence>;
    fn name(&self) -> &'static str;
}

/// Shared HTTP client for all providers and sinks.
pub fn build_http_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    use anyhow::Context;
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .context("building http client")
}

/// Send a request bounded by `budget` and hand back the body of a 2xx response.
pub(crate) async fn send_for_text(
    req: reqwest::RequestBuilder,
    budget: Duration,
) -> Result<String, Absence> {
    let resp = req
        .timeout(budget)
        .send()
        .await
        .map_err(|e| Absence::from_http(e, budget))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(Absence::ProviderUnavailable(format!("HTTP {status}")));
    }
    resp.text().await.map_err(|e| Absence::from_http(e, budget))
}

pub(crate) async fn send_for_json<T: DeserializeOwned>(
    req: reqwest::RequestBuilder,
    budget: Duration,
) -> Result<T, Absence> {
    let body = send_for_text(req, budget).await?;
    serde_json::from_str(&body).map_err(|e| Absence::MalformedResponse(e.to_string()))
}

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Normalize provider text: decode entities, strip tags, ASCII quotes, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);
    let stripped = RE_TAGS.replace_all(&decoded, "");

    let quoted = stripped
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    let out = RE_WS.replace_all(&quoted, " ").trim().to_string();

    // Length cap: 300 chars
    if out.chars().count() > 300 {
        return out.chars().take(300).collect();
    }
    out
}
