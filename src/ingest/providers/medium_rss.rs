// src/ingest/providers/medium_rss.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use std::time::Duration;

use crate::ingest::types::{FeedSource, RawFeedEntry};

pub const DEFAULT_FEED_BASE_URL: &str = "https://medium.com/feed/@";

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
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    // quick-xml matches on the local name, so `content:encoded` is `encoded`.
    #[serde(rename = "encoded")]
    content_encoded: Option<String>,
    content: Option<String>,
    description: Option<String>,
    #[serde(rename = "category", default)]
    categories: Vec<String>,
    guid: Option<Guid>,
}
// <guid isPermaLink="false">https://medium.com/p/…</guid>
#[derive(Debug, Deserialize)]
struct Guid {
    #[serde(rename = "$text", default)]
    value: String,
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Medium's RSS feed for one author (`https://medium.com/feed/@<author>`).
pub struct MediumRssFeed {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http {
        url: String,
        client: reqwest::Client,
    },
}

impl MediumRssFeed {
    /// Serve a pre-downloaded document (tests, offline runs).
    pub fn from_fixture(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    pub fn from_url(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("medium-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building feed http client")?;
        Ok(Self {
            mode: Mode::Http {
                url: url.into(),
                client,
            },
        })
    }

    pub fn for_author(base_url: &str, author: &str, timeout: Duration) -> Result<Self> {
        Self::from_url(feed_url(base_url, author), timeout)
    }

    pub fn parse_items_from_str(s: &str) -> Result<Vec<RawFeedEntry>> {
        let t0 = std::time::Instant::now();
        let xml_clean = scrub_html_entities_for_xml(s);
        let rss: Rss = from_str(&xml_clean).context("parsing medium rss xml")?;

        let out: Vec<RawFeedEntry> = rss
            .channel
            .item
            .into_iter()
            .map(|it| RawFeedEntry {
                title: it.title.unwrap_or_default().trim().to_string(),
                link: non_blank(it.link),
                pub_date: non_blank(it.pub_date),
                content_encoded: it.content_encoded,
                content: it.content,
                description: it.description,
                categories: it
                    .categories
                    .into_iter()
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect(),
                guid: non_blank(it.guid.map(|g| g.value)),
            })
            .collect();

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("sync_parse_ms").record(ms);
        counter!("sync_entries_total").increment(out.len() as u64);
        Ok(out)
    }
}

pub fn feed_url(base_url: &str, author: &str) -> String {
    format!("{}{}", base_url, author.trim_start_matches('@'))
}

#[async_trait]
impl FeedSource for MediumRssFeed {
    async fn fetch_entries(&self) -> Result<Vec<RawFeedEntry>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_items_from_str(s),
            Mode::Http { url, client } => {
                tracing::info!(target: "ingest", %url, "fetching feed");
                let t0 = std::time::Instant::now();
                let body = client
                    .get(url.as_str())
                    .send()
                    .await
                    .with_context(|| format!("GET {url}"))?
                    .error_for_status()
                    .with_context(|| format!("GET {url} non-2xx"))?
                    .text()
                    .await
                    .context("medium http .text()")?;
                histogram!("sync_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
                Self::parse_items_from_str(&body)
            }
        }
    }

    fn name(&self) -> &str {
        match &self.mode {
            Mode::Fixture(_) => "medium-fixture",
            Mode::Http { url, .. } => url,
        }
    }
}

/// HTML-only named entities are not valid XML; swap them for numeric references.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", "&#160;")
        .replace("&ndash;", "&#8211;")
        .replace("&mdash;", "&#8212;")
        .replace("&ldquo;", "&#8220;")
        .replace("&rdquo;", "&#8221;")
        .replace("&lsquo;", "&#8216;")
        .replace("&rsquo;", "&#8217;")
        .replace("&hellip;", "&#8230;")
}
