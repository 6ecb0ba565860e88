//! Error types for extraction

use std::path::PathBuf;

/// Extraction errors
///
/// `Io` and `Walk` are recoverable: the file is skipped and the scan
/// continues. The rest abort the scan before any file is read.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Scan root does not exist or is not a directory
    #[error("not a directory: {0}")]
    MissingDirectory(PathBuf),

    /// No file extensions to scan for
    #[error("no file extensions given")]
    NoExtensions,

    /// Marker pattern failed to compile
    #[error("invalid marker pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A source file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A directory entry could not be visited
    #[error("cannot walk {path}: {message}")]
    Walk {
        /// Entry that failed
        path: PathBuf,
        /// Traversal error
        message: String,
    },
}

impl ExtractError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the scan can continue past this error
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Walk { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_classification() {
        let io = ExtractError::io_error(
            "a.tex",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(io.is_recoverable());
        assert!(!ExtractError::NoExtensions.is_recoverable());
        assert!(!ExtractError::MissingDirectory("nope".into()).is_recoverable());
    }
}
