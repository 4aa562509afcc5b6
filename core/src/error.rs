//! Error types for the REST client.
//!
//! # Design
//! `Encoding` and `Transport` are kept apart because they fail at different
//! points: an encoding failure happens before anything touches the network
//! and is fixed by changing the input, while a transport failure means the
//! request was (or could not be) sent. A non-2xx status is never an error at
//! this layer; the caller inspects the status of the returned response.

use thiserror::Error;

/// Boxed cause carried by [`TransportError`] variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by `Client` construction and `Client::request`.
#[derive(Debug, Error)]
pub enum Error {
    /// The request body could not be serialized to JSON. Raised before any
    /// network activity.
    #[error("marshalling request body to JSON failed")]
    Encoding(#[source] serde_json::Error),

    /// The transport failed to build or execute the request.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The client configuration was rejected at construction time.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn is_encoding(&self) -> bool {
        matches!(self, Error::Encoding(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

/// Failures reported by a `Transport`. Messages name the failure kind only;
/// the underlying cause is reachable through `source()`.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The method, URL or a header could not be turned into a request.
    #[error("invalid request")]
    InvalidRequest(#[source] BoxError),

    /// The configured timeout elapsed before the exchange completed.
    #[error("request timed out")]
    Timeout(#[source] BoxError),

    /// The TCP connection was refused, reset or aborted, or ureq reported
    /// the host as unknown. Name-resolution failures raised by the system
    /// resolver arrive as uncategorized I/O errors and land in `Other`.
    #[error("connection failed")]
    Connect(#[source] BoxError),

    /// Any other failure: system resolver errors, TLS, protocol, I/O
    /// mid-exchange.
    #[error("transport failure")]
    Other(#[source] BoxError),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }
}
