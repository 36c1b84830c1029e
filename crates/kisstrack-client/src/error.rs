//! Error types for the dispatcher.

/// Errors that can occur while sending a call.
///
/// Only transport-level faults are reported. The tracking service answers
/// every request with the same 200 and a 1x1 image, so whether the call was
/// accepted server-side cannot be observed here.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// DNS, connect, TLS, timeout, or read/write failure, including a
    /// failure while draining the response body.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint does not form a valid URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}
