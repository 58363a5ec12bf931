// src/ingest/scheduler.rs
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::sync::{SyncOrchestrator, SyncState};

pub const DEFAULT_INTERVAL_SECS: u64 = 2 * 3600;

#[derive(Clone, Copy, Debug)]
pub struct SyncSchedulerCfg {
    pub interval_secs: u64,
}

impl Default for SyncSchedulerCfg {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
        }
    }
}

/// One scheduler tick. Returns `false` when it was skipped because a pass is
/// still in flight.
pub async fn run_tick(orchestrator: &SyncOrchestrator) -> bool {
    tracing::info!(target: "ingest", "scheduled sync triggered");
    match orchestrator.try_sync_once().await {
        None => {
            counter!("sync_skipped_ticks_total").increment(1);
            tracing::warn!(target: "ingest", "previous sync still running; skipping tick");
            false
        }
        Some(Ok(report)) => {
            tracing::info!(
                target: "ingest",
                ok = report.state == SyncState::Done,
                total = report.total,
                added = report.added.len(),
                "scheduled sync finished"
            );
            true
        }
        Some(Err(e)) => {
            tracing::error!(target: "ingest", error = %e, "scheduled sync failed");
            true
        }
    }
}

/// Sync immediately, then every `interval_secs`. Runs until the task is aborted.
/// Late ticks are dropped rather than bunched up.
pub fn spawn_sync_scheduler(
    orchestrator: Arc<SyncOrchestrator>,
    cfg: SyncSchedulerCfg,
) -> JoinHandle<()> {
    let period = Duration::from_secs(cfg.interval_secs.max(1));
    spawn_with_period(orchestrator, period)
}

pub(crate) fn spawn_with_period(
    orchestrator: Arc<SyncOrchestrator>,
    period: Duration,
) -> JoinHandle<()> {
    tracing::info!(
        target: "ingest",
        every_secs = period.as_secs(),
        "starting medium sync watcher"
    );
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            // First tick completes immediately.
            ticker.tick().await;
            run_tick(&orchestrator).await;
        }
    })
}
