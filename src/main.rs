//! medium-sync: pull the author's Medium feed into the blog's JSON post store.
//!
//! One pass by default; `--watch` keeps syncing on a fixed interval
//! (every two hours unless configured otherwise) until Ctrl-C.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::ValueHint;
use tracing::{error, info};

use medium_sync::ingest::config::{load_config_default, load_config_from, SyncConfig};
use medium_sync::ingest::scheduler::{spawn_sync_scheduler, SyncSchedulerCfg};
use medium_sync::logging::init_tracing;
use medium_sync::SyncState;

#[derive(clap::Parser, Debug, Clone)]
#[command(version, about)]
struct Args {
    /// Keep running and re-sync on a fixed interval.
    #[arg(long)]
    watch: bool,

    /// Path to a TOML or JSON config file.
    ///
    /// Without it, `config/medium_sync.toml` then `config/medium_sync.json`
    /// are tried before falling back to built-in defaults.
    #[arg(short, long, env = "MEDIUM_SYNC_CONFIG", value_hint(ValueHint::FilePath))]
    config: Option<PathBuf>,

    /// Medium handle to sync (with or without `@`).
    #[arg(long)]
    author: Option<String>,

    /// Path to the JSON post store.
    #[arg(long, value_hint(ValueHint::FilePath))]
    store: Option<PathBuf>,

    /// Seconds between passes in watch mode.
    #[arg(long)]
    interval_secs: Option<u64>,
}

impl Args {
    fn load_config(&self) -> Result<SyncConfig> {
        let mut cfg = match &self.config {
            Some(p) => {
                let mut c = load_config_from(p)?;
                c.apply_env_overrides()?;
                c
            }
            None => load_config_default()?,
        };
        if let Some(a) = &self.author {
            cfg.author = a.clone();
        }
        if let Some(s) = &self.store {
            cfg.store_path = s.clone();
        }
        if let Some(i) = self.interval_secs {
            cfg.interval_secs = i;
        }
        Ok(cfg)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let args: Args = clap::Parser::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let cfg = args.load_config()?;
    let orchestrator = cfg.build_orchestrator()?;
    info!(
        author = %cfg.author,
        store = %cfg.store_path.display(),
        "medium sync configured"
    );

    if args.watch {
        info!(every_secs = cfg.interval_secs, "watcher is running; press Ctrl+C to stop");
        let handle = spawn_sync_scheduler(
            Arc::new(orchestrator),
            SyncSchedulerCfg {
                interval_secs: cfg.interval_secs,
            },
        );
        tokio::signal::ctrl_c().await?;
        handle.abort();
        info!("watcher stopped");
        return Ok(());
    }

    let report = orchestrator.sync_once().await?;
    if report.state == SyncState::Done {
        info!(total = report.total, added = report.added.len(), "sync completed");
    } else {
        info!("sync completed without fetching posts");
    }
    Ok(())
}
