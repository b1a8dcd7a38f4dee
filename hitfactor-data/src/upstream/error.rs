//! Error types produced by the upstream API client.

use std::io;

use thiserror::Error;

/// Transport-level errors encountered while calling the upstream API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The server returned an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short error description supplied by the server.
        message: String,
    },
    /// The request failed due to an I/O error.
    #[error("network error contacting {url}: {source}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// I/O error reported by the transport.
        source: io::Error,
    },
    /// The response body was not JSON.
    #[error("response from {url} was not valid JSON: {source}")]
    Decode {
        /// Fully qualified request URL.
        url: String,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    Client {
        /// Underlying client error.
        source: reqwest::Error,
    },
}

/// Error returned when a credential pool is built without credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("at least one API credential is required")]
pub struct EmptyCredentialPool;
