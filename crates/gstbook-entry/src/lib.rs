//! # GSTBook Entry
//!
//! Session layer for the purchase-entry form. Owns the form state and
//! hands storage to the native command layer through [`PurchaseBackend`].
//!
//! ## Module Organization
//! ```text
//! gstbook_entry/
//! ├── lib.rs          ◄─── You are here (logging & session opening)
//! ├── session.rs      ◄─── PurchaseEntrySession (edit, view, submit)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── form.rs     ◄─── Draft, mode and last entry
//! │   └── suppliers.rs◄─── Loaded supplier page
//! ├── backend/
//! │   ├── mod.rs      ◄─── PurchaseBackend trait
//! │   └── memory.rs   ◄─── In-memory command layer
//! ├── config.rs       ◄─── entry.toml + environment overrides
//! └── error.rs        ◄─── API error type for the frontend
//! ```
//!
//! ## Opening a Session
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  init_tracing()                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  EntryConfig::load_or_default(path)   defaults ◄ entry.toml ◄ env       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PurchaseEntrySession::new(backend, config)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  session.load_suppliers(None).await                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod session;
pub mod state;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

pub use backend::{InMemoryBackend, PurchaseBackend};
pub use config::EntryConfig;
pub use error::{ApiError, ApiResult, BackendError, ErrorCode};
pub use session::{FormView, PurchaseEntrySession};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=gstbook_entry=trace` - Show trace for the session layer only
/// - Default: INFO, with DEBUG form snapshots from the gstbook crates
///
/// Safe to call more than once; later calls leave the first subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gstbook_core=debug,gstbook_entry=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Loads configuration and opens a session over `backend`.
///
/// A missing or broken config file is logged and replaced by defaults.
pub fn open_session(
    backend: Arc<dyn PurchaseBackend>,
    config_path: Option<PathBuf>,
) -> PurchaseEntrySession {
    let config = EntryConfig::load_or_default(config_path);
    info!(
        home_state = %config.home_state_code,
        page_size = config.supplier_page_size,
        "Opening purchase entry"
    );
    PurchaseEntrySession::new(backend, config)
}
