// src/ingest/types.rs
use anyhow::Result;

/// One `<item>` as published by the feed, before any cleanup.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct RawFeedEntry {
    pub title: String,
    pub link: Option<String>,
    pub pub_date: Option<String>, // RFC 2822 as sent by the feed
    pub content_encoded: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub categories: Vec<String>,
    pub guid: Option<String>,
}

#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_entries(&self) -> Result<Vec<RawFeedEntry>>;
    fn name(&self) -> &str;
}
