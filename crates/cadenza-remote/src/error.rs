//! Error types for the remote catalog and metadata provider.

use thiserror::Error;

/// Errors that can occur while talking to a remote service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The service answered with a non-success status.
    #[error("HTTP error from {source_name}: {message}")]
    Http {
        source_name: String,
        message: String,
    },

    /// The service rejected our credentials.
    #[error("unauthorized by {source_name}")]
    Unauthorized { source_name: String },

    /// A response could not be parsed.
    #[error("parse error from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// A response parsed but lacked a field we need.
    #[error("missing {field} in response from {source_name}")]
    MissingField {
        source_name: String,
        field: &'static str,
    },

    /// An error propagated from `reqwest` (transport, timeout, ...).
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl RemoteError {
    /// Returns `true` when the error is transient and the operation may
    /// succeed if tried again later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Request(_))
    }

    /// Returns `true` when the error means the credentials are no good.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Convenience alias for remote results.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;
