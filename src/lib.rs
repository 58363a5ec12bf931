// src/lib.rs
// Public library surface shared by both binaries and the integration tests.

pub mod analyze;
pub mod api;
pub mod blog;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod store;
pub mod sync;

// ---- Re-exports for stable public API ----
pub use crate::api::create_router;
pub use crate::error::{MissingContent, SyncError};
pub use crate::ingest::config::{load_config_default, load_config_from, SyncConfig};
pub use crate::model::{Category, NormalizedPost};
pub use crate::store::PostStore;
pub use crate::sync::{SyncOrchestrator, SyncReport, SyncState};
