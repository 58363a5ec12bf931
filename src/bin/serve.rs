//! medium-sync-serve: read-only blog post API over the JSON post store.
//! Optionally runs the sync watcher in-process (`--watch`).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueHint;
use tracing::{info, warn};

use medium_sync::api::{create_router, AppState};
use medium_sync::ingest::config::{load_config_default, load_config_from};
use medium_sync::ingest::scheduler::{spawn_sync_scheduler, SyncSchedulerCfg};
use medium_sync::logging::init_tracing;
use medium_sync::metrics::Metrics;

#[derive(clap::Parser, Debug, Clone)]
#[command(version, about)]
struct Args {
    /// Address to bind the HTTP server to.
    #[arg(long, env = "MEDIUM_SYNC_BIND_ADDR", default_value = "127.0.0.1:8000")]
    bind_addr: SocketAddr,

    /// Path to a TOML or JSON config file.
    #[arg(short, long, env = "MEDIUM_SYNC_CONFIG", value_hint(ValueHint::FilePath))]
    config: Option<PathBuf>,

    /// Also run the periodic sync in this process.
    #[arg(long)]
    watch: bool,

    /// Skip installing the Prometheus recorder and `/metrics`.
    #[arg(long)]
    no_metrics: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let args: Args = clap::Parser::parse();
    let cfg = match &args.config {
        Some(p) => {
            let mut c = load_config_from(p)?;
            c.apply_env_overrides()?;
            c
        }
        None => load_config_default()?,
    };

    let state = AppState::new(cfg.store(), cfg.author_profile_url());
    let mut router = create_router(state);

    if !args.no_metrics {
        match Metrics::init() {
            Ok(m) => router = router.merge(m.router()),
            Err(e) => warn!(error = %e, "metrics disabled"),
        }
    }

    let watcher = if args.watch {
        let orchestrator = Arc::new(cfg.build_orchestrator()?);
        Some(spawn_sync_scheduler(
            orchestrator,
            SyncSchedulerCfg {
                interval_secs: cfg.interval_secs,
            },
        ))
    } else {
        None
    };

    let listener = tokio::net::TcpListener::bind(args.bind_addr)
        .await
        .with_context(|| format!("binding {}", args.bind_addr))?;
    info!(addr = %args.bind_addr, store = %cfg.store_path.display(), "serving blog posts");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("http server")?;

    if let Some(h) = watcher {
        h.abort();
    }
    Ok(())
}
