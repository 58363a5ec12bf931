// src/ingest/mod.rs
pub mod config;
pub mod providers;
pub mod scheduler;
pub mod types;

pub use providers::medium_rss::MediumRssFeed;
pub use types::{FeedSource, RawFeedEntry};
