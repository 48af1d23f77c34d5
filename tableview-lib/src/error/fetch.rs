//! Remote fetch error types

/// Errors reported by a remote list collaborator.
///
/// Cloneable so the last failure can be held in display state next to the
/// last good page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// HTTP error response from the remote service.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Network error before a response arrived.
    #[error("Network error: {0}")]
    Network(String),

    /// The response could not be decoded.
    #[error("Response parse error: {0}")]
    Parse(String),

    /// The fetch task went away without producing a result.
    #[error("Fetch cancelled")]
    Cancelled,
}

impl FetchError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this error is potentially retryable.
    ///
    /// Nothing in this crate retries; this is for the remote client.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Network(_) => true,
            _ => false,
        }
    }
}
