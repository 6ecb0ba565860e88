//! Error types for export rendering

use std::path::PathBuf;

/// Export errors
///
/// Exports run after the ledger is saved, so none of these roll back a sync.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Serialization failed
    #[error("failed to render JSON export: {0}")]
    Json(#[from] serde_json::Error),

    /// Rendered output was not valid UTF-8
    #[error("rendered export is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// Output file could not be written
    #[error("failed to write export {path}: {source}")]
    Io {
        /// Export target
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    /// Create I/O error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for export operations
pub type ReportResult<T> = Result<T, ReportError>;
