// src/sync.rs
//! Sync orchestrator: fetch → transform → merge → persist → report.
//!
//! State machine:
//! `Idle → Fetching → Transforming → Merging → Persisting → Done`,
//! with `Failed` reachable from `Fetching` only (the store is left untouched).

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::analyze::classify::Classifier;
use crate::analyze::slug::disambiguation_suffix;
use crate::analyze::transform::PostTransformer;
use crate::error::{Result, SyncError};
use crate::ingest::types::FeedSource;
use crate::model::{Category, NormalizedPost};
use crate::store::PostStore;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("sync_runs_total", "Sync passes started.");
        describe_counter!("sync_fetch_errors_total", "Feed fetch/parse failures.");
        describe_counter!("sync_posts_added_total", "Posts seen for the first time.");
        describe_counter!(
            "sync_store_write_errors_total",
            "Failures persisting the merged collection."
        );
        describe_counter!(
            "sync_skipped_ticks_total",
            "Scheduler ticks skipped because a pass was running."
        );
        describe_counter!("sync_entries_total", "Raw entries parsed from the feed.");
        describe_histogram!("sync_fetch_ms", "Feed download time in milliseconds.");
        describe_histogram!("sync_parse_ms", "Feed parse time in milliseconds.");
        describe_gauge!("sync_posts_total", "Posts in the store after the last pass.");
        describe_gauge!("sync_last_run_ts", "Unix ts of the last completed pass.");
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncState {
    Idle,
    Fetching,
    Transforming,
    Merging,
    Persisting,
    Done,
    Failed,
}

/// What happens to stored posts that vanished from the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Retention {
    /// Keep them as they are (only `featured` is recomputed).
    #[default]
    Keep,
    /// Drop them; the store mirrors the latest feed.
    Prune,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOptions {
    pub retention: Retention,
    pub disambiguate_slugs: bool,
}

/// A post that was not in the store before this pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedPost {
    pub title: String,
    pub category: Category,
    pub read_time: u32,
    pub medium_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub state: SyncState,
    pub fetched: usize,
    pub total: usize,
    pub added: Vec<AddedPost>,
    pub retained_stale: usize,
    pub finished_at: DateTime<Utc>,
}

impl SyncReport {
    fn failed(now: DateTime<Utc>) -> Self {
        Self {
            state: SyncState::Failed,
            fetched: 0,
            total: 0,
            added: Vec::new(),
            retained_stale: 0,
            finished_at: now,
        }
    }
}

/// Result of merging a fresh batch into stored history.
#[derive(Debug, Clone)]
pub struct Merged {
    pub posts: Vec<NormalizedPost>,
    pub added: Vec<AddedPost>,
    pub retained_stale: usize,
}

/// Merge `fresh` (feed order) into `existing`, keyed by `mediumUrl`.
///
/// Matching records keep their stored `id`; everything else comes from the
/// fresh copy. The output is sorted newest first with exactly one `featured`.
pub fn merge_posts(
    existing: Vec<NormalizedPost>,
    fresh: Vec<NormalizedPost>,
    now: DateTime<Utc>,
    opts: MergeOptions,
) -> Merged {
    let mut by_url: HashMap<String, NormalizedPost> = HashMap::with_capacity(existing.len());
    let mut existing_order: Vec<String> = Vec::with_capacity(existing.len());
    for p in existing {
        if !by_url.contains_key(&p.medium_url) {
            existing_order.push(p.medium_url.clone());
            by_url.insert(p.medium_url.clone(), p);
        }
    }

    let mut seen: HashSet<String> = HashSet::with_capacity(fresh.len());
    let mut posts = Vec::with_capacity(fresh.len() + by_url.len());
    let mut added = Vec::new();
    for mut p in fresh {
        if !seen.insert(p.medium_url.clone()) {
            continue;
        }
        match by_url.remove(&p.medium_url) {
            Some(old) => {
                p.id = old.id;
                p.last_sync = now;
            }
            None => added.push(AddedPost {
                title: p.title.clone(),
                category: p.category,
                read_time: p.read_time,
                medium_url: p.medium_url.clone(),
            }),
        }
        posts.push(p);
    }

    let mut retained_stale = 0;
    if opts.retention == Retention::Keep {
        for url in existing_order {
            if let Some(old) = by_url.remove(&url) {
                retained_stale += 1;
                posts.push(old);
            }
        }
    }

    // Stable: equal dates keep feed order.
    posts.sort_by(|a, b| b.date.cmp(&a.date));
    for (i, p) in posts.iter_mut().enumerate() {
        p.featured = i == 0;
    }
    if opts.disambiguate_slugs {
        disambiguate_slugs(&mut posts);
    }

    Merged {
        posts,
        added,
        retained_stale,
    }
}

/// Later posts sharing an earlier post's slug get a short url hash appended.
pub fn disambiguate_slugs(posts: &mut [NormalizedPost]) {
    let mut taken: HashSet<String> = HashSet::with_capacity(posts.len());
    for p in posts.iter_mut() {
        if !taken.insert(p.slug.clone()) {
            let suffix = disambiguation_suffix(&p.medium_url);
            p.slug = if p.slug.is_empty() {
                suffix
            } else {
                format!("{}-{}", p.slug, suffix)
            };
            taken.insert(p.slug.clone());
        }
    }
}

pub struct SyncOrchestrator {
    source: Box<dyn FeedSource>,
    classifier: Box<dyn Classifier>,
    store: PostStore,
    opts: MergeOptions,
    running: Mutex<()>,
}

impl SyncOrchestrator {
    pub fn new(
        source: Box<dyn FeedSource>,
        classifier: Box<dyn Classifier>,
        store: PostStore,
        opts: MergeOptions,
    ) -> Self {
        Self {
            source,
            classifier,
            store,
            opts,
            running: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &PostStore {
        &self.store
    }

    /// Run one pass, waiting for any pass already in flight.
    pub async fn sync_once(&self) -> Result<SyncReport> {
        let _guard = self.running.lock().await;
        self.run_pass().await
    }

    /// Run one pass unless another is in flight (`None` then).
    pub async fn try_sync_once(&self) -> Option<Result<SyncReport>> {
        let _guard = self.running.try_lock().ok()?;
        Some(self.run_pass().await)
    }

    async fn run_pass(&self) -> Result<SyncReport> {
        ensure_metrics_described();
        counter!("sync_runs_total").increment(1);

        let mut state = SyncState::Idle;
        let now = Utc::now();
        info!(target: "sync", source = self.source.name(), "starting medium sync");

        advance(&mut state, SyncState::Fetching);
        let entries = match self.source.fetch_entries().await {
            Ok(v) if v.is_empty() => {
                warn!(target: "sync", "feed returned no entries; store left untouched");
                advance(&mut state, SyncState::Failed);
                return Ok(SyncReport::failed(now));
            }
            Ok(v) => v,
            Err(e) => {
                let e = SyncError::Fetch(e);
                warn!(target: "sync", error = %e, "fetch failed; store left untouched");
                counter!("sync_fetch_errors_total").increment(1);
                advance(&mut state, SyncState::Failed);
                return Ok(SyncReport::failed(now));
            }
        };
        info!(target: "sync", count = entries.len(), "fetched feed entries");

        advance(&mut state, SyncState::Transforming);
        let transformer = PostTransformer::new(self.classifier.as_ref());
        let fresh: Vec<NormalizedPost> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| transformer.transform(e, i, now))
            .collect();

        advance(&mut state, SyncState::Merging);
        let existing = self.store.load().await;
        let merged = merge_posts(existing, fresh, now, self.opts);

        advance(&mut state, SyncState::Persisting);
        if let Err(e) = self.store.save(&merged.posts).await {
            error!(target: "sync", error = %e, "could not persist merged posts");
            counter!("sync_store_write_errors_total").increment(1);
            return Err(e);
        }

        advance(&mut state, SyncState::Done);
        if merged.added.is_empty() {
            info!(target: "sync", "no new posts (all posts up to date)");
        }
        for a in &merged.added {
            info!(
                target: "sync",
                title = %a.title,
                category = %a.category,
                read_time = a.read_time,
                "added post"
            );
        }
        info!(
            target: "sync",
            total = merged.posts.len(),
            added = merged.added.len(),
            retained_stale = merged.retained_stale,
            "medium sync finished"
        );

        counter!("sync_posts_added_total").increment(merged.added.len() as u64);
        gauge!("sync_posts_total").set(merged.posts.len() as f64);
        gauge!("sync_last_run_ts").set(now.timestamp() as f64);

        Ok(SyncReport {
            state,
            fetched: entries.len(),
            total: merged.posts.len(),
            added: merged.added,
            retained_stale: merged.retained_stale,
            finished_at: Utc::now(),
        })
    }
}

fn advance(state: &mut SyncState, next: SyncState) {
    tracing::debug!(target: "sync", from = ?*state, to = ?next, "state");
    *state = next;
}
