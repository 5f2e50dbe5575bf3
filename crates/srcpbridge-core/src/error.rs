//! Error types for srcpbridge.
//!
//! All fallible operations across the bridge return [`Result<T>`], which
//! uses [`Error`] as the error type. Feed-parsing, transport, and
//! configuration errors are all captured here.
//!
//! None of these errors is fatal to the engine: a malformed feed message
//! is reported and dropped, a failed datagram send is logged and ignored.
//! The only fatal conditions belong to transport setup in the binary
//! (unable to bind the control port, unable to reach the webserver).

/// The error type for all srcpbridge operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An inbound feed message was not valid JSON (or did not match the
    /// snapshot schema). The offending message is dropped; translation
    /// state is left untouched.
    #[error("malformed feed message: {0}")]
    Feed(#[from] serde_json::Error),

    /// A transport-level error (UDP socket, WebSocket link).
    #[error("transport error: {0}")]
    Transport(String),

    /// The feed connection was closed by the remote end.
    #[error("feed connection closed")]
    FeedClosed,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;
