//! todosync record model
//!
//! Shapes shared by every stage of a sync run.
//!
//! # Core Concepts
//!
//! - [`Identity`]: `file:line` key joining candidates, ledger and remote
//! - [`CandidateRecord`]: marker extracted this run
//! - [`LedgerRecord`]: durable reconciliation state per identity
//! - [`RemoteRecord`]: the remote store's current view of a task
//!
//! # Example
//!
//! ```rust
//! use todosync_model::CandidateRecord;
//!
//! let candidate = CandidateRecord::from_marker("paper.tex", 3, "bug: fix X");
//! assert_eq!(candidate.identity.as_str(), "paper.tex:3");
//! assert_eq!(candidate.category.as_str(), "BUG");
//! ```

#![warn(unreachable_pub)]

mod error;
mod identity;
mod record;

pub use error::ModelError;
pub use identity::{split_marker, Category, Identity, MarkerText, UNCATEGORIZED};
pub use record::{
    CandidateRecord, LedgerRecord, RecordStatus, RemoteDraft, RemoteId, RemoteRecord,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
