//! Error types for the Momentum API client.
//!
//! # Design
//! `ApiError` keeps transport failures (the request never produced a usable
//! response) apart from business failures (the server answered with a non-2xx
//! status and, usually, a `message`). `NotFound` gets its own variant because
//! toggle and delete callers routinely distinguish a stale id from a server
//! fault. `ErrorKind` is the coarse classification handed to the repository
//! layer.

use std::error::Error as StdError;

use thiserror::Error;

/// Underlying cause of a transport failure.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Errors returned by `ApiClient`, `Transport` implementations and `Api`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, reset, TLS failure, unreadable body.
    #[error("transport failure: {source}")]
    Transport {
        #[source]
        source: BoxError,
    },

    /// The request did not complete within the configured timeouts.
    #[error("request timed out")]
    Timeout,

    /// The server returned 404.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {message}")]
    Business { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A path id or URL failed shape validation before any I/O happened.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Coarse failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network unreachable, timeout.
    Transport,
    /// The server rejected the request.
    Business,
    /// The server answered with something we could not decode.
    Malformed,
    /// The caller passed input that could not form a request.
    Invalid,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport { .. } | ApiError::Timeout => ErrorKind::Transport,
            ApiError::NotFound { .. } | ApiError::Business { .. } => ErrorKind::Business,
            ApiError::Deserialization(_) => ErrorKind::Malformed,
            ApiError::Serialization(_) | ApiError::InvalidInput(_) => ErrorKind::Invalid,
        }
    }

    pub fn transport(source: impl Into<BoxError>) -> Self {
        ApiError::Transport {
            source: source.into(),
        }
    }
}
