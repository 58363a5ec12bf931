// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::analyze::classify::{Classifier, KeywordClassifier};
use crate::ingest::providers::medium_rss::{MediumRssFeed, DEFAULT_FEED_BASE_URL};
use crate::ingest::scheduler::DEFAULT_INTERVAL_SECS;
use crate::store::{PostStore, DEFAULT_STORE_PATH};
use crate::sync::{MergeOptions, Retention, SyncOrchestrator};

pub const ENV_CONFIG_PATH: &str = "MEDIUM_SYNC_CONFIG";
pub const ENV_AUTHOR: &str = "MEDIUM_AUTHOR";
pub const ENV_STORE_PATH: &str = "MEDIUM_STORE_PATH";
pub const ENV_INTERVAL_SECS: &str = "MEDIUM_SYNC_INTERVAL_SECS";

pub const DEFAULT_AUTHOR: &str = "andersonchen_2095";

/// Everything a sync run needs. Missing keys take the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Medium handle, with or without the leading `@`.
    pub author: String,
    pub feed_base_url: String,
    pub store_path: PathBuf,
    pub interval_secs: u64,
    pub fetch_timeout_secs: u64,
    pub retention: Retention,
    pub disambiguate_slugs: bool,
    /// Optional TOML keyword table replacing the built-in classifier seed.
    pub keywords_path: Option<PathBuf>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            author: DEFAULT_AUTHOR.to_string(),
            feed_base_url: DEFAULT_FEED_BASE_URL.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            interval_secs: DEFAULT_INTERVAL_SECS,
            fetch_timeout_secs: 30,
            retention: Retention::Keep,
            disambiguate_slugs: false,
            keywords_path: None,
        }
    }
}

impl SyncConfig {
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            retention: self.retention,
            disambiguate_slugs: self.disambiguate_slugs,
        }
    }

    pub fn store(&self) -> PostStore {
        PostStore::new(&self.store_path)
    }

    pub fn author_profile_url(&self) -> String {
        format!("https://medium.com/@{}", self.author.trim_start_matches('@'))
    }

    pub fn classifier(&self) -> Result<Box<dyn Classifier>> {
        Ok(match &self.keywords_path {
            Some(p) => Box::new(KeywordClassifier::load_from_file(p)?),
            None => Box::new(KeywordClassifier::default_seed()),
        })
    }

    /// HTTP-backed orchestrator for this configuration.
    pub fn build_orchestrator(&self) -> Result<SyncOrchestrator> {
        let feed = MediumRssFeed::for_author(
            &self.feed_base_url,
            &self.author,
            Duration::from_secs(self.fetch_timeout_secs.max(1)),
        )?;
        Ok(SyncOrchestrator::new(
            Box::new(feed),
            self.classifier()?,
            self.store(),
            self.merge_options(),
        ))
    }

    /// `MEDIUM_AUTHOR`, `MEDIUM_STORE_PATH`, `MEDIUM_SYNC_INTERVAL_SECS`.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(a) = non_empty_env(ENV_AUTHOR) {
            self.author = a;
        }
        if let Some(p) = non_empty_env(ENV_STORE_PATH) {
            self.store_path = PathBuf::from(p);
        }
        if let Some(s) = non_empty_env(ENV_INTERVAL_SECS) {
            self.interval_secs = s
                .parse()
                .with_context(|| format!("{ENV_INTERVAL_SECS}={s} is not a number of seconds"))?;
        }
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Load config from an explicit path. Supports TOML or JSON formats.
pub fn load_config_from(path: &Path) -> Result<SyncConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading sync config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
        .with_context(|| format!("parsing sync config {}", path.display()))
}

/// Load config using env var + fallbacks, then apply env overrides:
/// 1) $MEDIUM_SYNC_CONFIG
/// 2) config/medium_sync.toml
/// 3) config/medium_sync.json
/// 4) built-in defaults
pub fn load_config_default() -> Result<SyncConfig> {
    let mut cfg = if let Some(p) = non_empty_env(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        load_config_from(&pb)?
    } else {
        let toml_p = PathBuf::from("config/medium_sync.toml");
        let json_p = PathBuf::from("config/medium_sync.json");
        if toml_p.exists() {
            load_config_from(&toml_p)?
        } else if json_p.exists() {
            load_config_from(&json_p)?
        } else {
            SyncConfig::default()
        }
    };
    cfg.apply_env_overrides()?;
    Ok(cfg)
}

fn parse_config(s: &str, hint_ext: &str) -> Result<SyncConfig> {
    match hint_ext {
        "toml" => Ok(toml::from_str(s)?),
        "json" => Ok(serde_json::from_str(s)?),
        _ => toml::from_str(s)
            .map_err(anyhow::Error::from)
            .or_else(|_| serde_json::from_str(s).map_err(anyhow::Error::from))
            .map_err(|_| anyhow!("unsupported config format")),
    }
}
