//! Error types for sync runs
//!
//! Everything here aborts a run. Per-item remote failures never surface as
//! a [`SyncError`]; they are tallied in the reconcile report instead.

use std::path::PathBuf;
use todosync_extract::ExtractError;
use todosync_ledger::LedgerError;
use todosync_remote::RemoteError;
use todosync_report::ReportError;

/// Invalid run configuration, detected before any I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Source directory missing or not a directory
    #[error("directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    /// No file extensions to scan
    #[error("no file types configured")]
    NoExtensions,

    /// Sync needs an API credential
    #[error("missing API credential: pass --api-key or set {0}")]
    MissingCredential(&'static str),

    /// Remote client settings rejected
    #[error("invalid remote configuration: {0}")]
    Remote(String),
}

/// Fatal sync errors
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Configuration rejected
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Ledger could not be locked, loaded or saved
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Source tree could not be scanned
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    /// Initial remote listing failed; nothing was mutated
    #[error("failed to list remote tasks: {0}")]
    List(#[source] RemoteError),

    /// Export failed after the ledger was saved
    #[error("export failed: {0}")]
    Export(#[from] ReportError),
}

impl SyncError {
    /// Check if a rerun without changes may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::List(e) => e.is_retryable(),
            Self::Ledger(LedgerError::Locked { .. }) => true,
            _ => false,
        }
    }

    /// Check if the ledger on disk reflects this run
    #[inline]
    #[must_use]
    pub fn ledger_saved(&self) -> bool {
        matches!(self, Self::Export(_))
    }
}
