// src/logging.rs
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_LOG: &str = "MEDIUM_SYNC_LOG";
pub const ENV_LOG_FORMAT: &str = "MEDIUM_SYNC_LOG_FORMAT";

/// Install the global subscriber.
/// Filter: `MEDIUM_SYNC_LOG`, then `RUST_LOG`, then `info`.
/// `MEDIUM_SYNC_LOG_FORMAT=json` switches to one JSON object per line.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var(ENV_LOG_FORMAT)
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    let res = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
    if let Err(e) = res {
        eprintln!("tracing already initialized: {e}");
    }
}
