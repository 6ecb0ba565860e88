//! todosync Ledger Store
//!
//! Durable local mapping from record identity to last-known reconciliation
//! state (active/completed, remote linkage, timestamps).
//!
//! # Core Operations
//!
//! - **Load**: missing file ⇒ empty ledger, unreadable file ⇒ `CorruptLedger`
//! - **Save**: temp file + fsync + rename, so a crash never truncates the
//!   previous document
//! - **Lock**: one run per ledger path
//!
//! # Persisted Layout
//!
//! ```text
//! {
//!     "todos": [
//!         { "id": "paper.tex:3", "category": "BUG", "text": "fix X",
//!           "file": "paper.tex", "line": 3, "status": "active",
//!           "created_at": "...", "completed_at": null, "api_id": "..." }
//!     ]
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod ledger;
mod lock;
mod store;

pub use error::{LedgerError, LedgerResult};
pub use ledger::Ledger;
pub use lock::{lock_path_for, LedgerLock, STALE_LOCK_AGE};
pub use store::{load, save, to_json_bytes, LedgerStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
