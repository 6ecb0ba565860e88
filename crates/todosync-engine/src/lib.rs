//! todosync Engine
//!
//! Keeps TODO markers in a source tree reconciled with a remote task store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌─────────────┐
//! │  Extractor  │   │   Ledger    │   │ RemoteStore │
//! │ (candidates)│   │ (durable)   │   │ (snapshot)  │
//! └──────┬──────┘   └──────┬──────┘   └──────┬──────┘
//!        └─────────────────┼─────────────────┘
//!                          ▼
//!                   ┌─────────────┐
//!                   │    diff     │  create / update / delete
//!                   └──────┬──────┘
//!                          ▼
//!                   ┌─────────────┐
//!                   │  reconcile  │  per-item isolation, dry run
//!                   └──────┬──────┘
//!                          ▼
//!                 save ledger, exports
//! ```
//!
//! Local file content is authoritative; the ledger records which remote
//! item belongs to which identity and when a marker was completed.
//!
//! # Example
//!
//! ```rust,no_run
//! use todosync_engine::{sync, SyncConfig};
//! use todosync_remote::{MotionClient, RemoteConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MotionClient::new(RemoteConfig::new("api-key"))?;
//! let summary = sync(SyncConfig::new("paper/").with_dry_run(true), &client).await?;
//! println!("would add {}", summary.created());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod diff;
pub mod error;
pub mod reconcile;
pub mod run;

pub use config::{
    ExportConfig, SourceConfig, SyncConfig, DEFAULT_FILE_TYPES, DEFAULT_JSON_FILE,
    DEFAULT_LEDGER_FILE, DEFAULT_MARKDOWN_FILE,
};
pub use diff::{diff, DeleteItem, Diff, UpdateItem};
pub use error::{ConfigError, SyncError};
pub use reconcile::{reconcile, reconcile_at, ItemFailure, Operation, ReconcileReport};
pub use run::{export, sync, ExportSummary, SyncRun, SyncSummary};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
