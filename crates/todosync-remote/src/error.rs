//! Error types for the remote store

/// Remote store errors
///
/// The reconciler treats every variant as a per-item failure. Only the
/// initial `list` aborts a run.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Non-2xx response
    #[error("remote returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Transport failure (connect, timeout, TLS)
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected schema
    #[error("invalid response from {context}: {source}")]
    Decode {
        /// Request that produced the body
        context: String,
        /// Parse failure
        #[source]
        source: serde_json::Error,
    },

    /// Client could not be configured
    #[error("invalid client configuration: {0}")]
    Config(String),

    /// Server handed back a cursor it already returned
    #[error("pagination loop detected at cursor {0}")]
    PaginationLoop(String),
}

impl RemoteError {
    /// Create status error
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// HTTP status, if the server answered
    #[inline]
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if a later run is likely to succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Result type alias for remote operations
pub type RemoteResult<T> = Result<T, RemoteError>;
