// src/ingest/providers/mod.rs
pub mod medium_rss;
