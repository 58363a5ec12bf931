// src/error.rs
//! Error taxonomy for the sync pipeline.
//!
//! Only `StoreWrite` ever reaches a caller; fetch and store-read
//! failures are recovered inside the orchestrator and only show up in logs.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Error, Debug)]
pub enum SyncError {
    /// Upstream feed unreachable or not parseable.
    #[error("feed fetch failed: {0:#}")]
    Fetch(anyhow::Error),

    /// Persisted file present but unreadable or not a JSON post array.
    #[error("reading store {path}: {message}")]
    StoreRead { path: PathBuf, message: String },

    /// Merged collection could not be persisted.
    #[error("writing store {path}: {source}")]
    StoreWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A raw entry carried no populated content field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("entry '{title}' has no content, encoded content or description")]
pub struct MissingContent {
    pub title: String,
}
