//! Error types for the ledger store
//!
//! Every variant is fatal for a sync run:
//! - Corrupt documents abort before any remote mutation
//! - Persistence failures leave the previous on-disk ledger intact
//! - Lock contention aborts before the ledger is even read

use std::path::PathBuf;

/// Ledger store errors
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Ledger exists but cannot be read or parsed
    #[error("corrupt ledger at {path}: {reason}")]
    CorruptLedger {
        /// Ledger document path
        path: PathBuf,
        /// Read, parse or invariant failure
        reason: String,
    },

    /// Ledger cannot be written
    #[error("failed to persist ledger to {path}: {source}")]
    Persistence {
        /// Ledger document path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Another run holds the lock
    #[error("ledger is locked by {}: {lock_path}", owner_label(.pid))]
    Locked {
        /// Lock file path
        lock_path: PathBuf,
        /// Pid recorded by the owning run, if readable
        pid: Option<u32>,
    },

    /// Lock file could not be created
    #[error("failed to acquire ledger lock {lock_path}: {source}")]
    Lock {
        /// Lock file path
        lock_path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

impl LedgerError {
    /// Create corrupt ledger error for path
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::CorruptLedger {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create persistence error for path
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }
}

fn owner_label(pid: &Option<u32>) -> String {
    pid.map_or_else(|| "another run".to_string(), |pid| format!("run with pid {pid}"))
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
