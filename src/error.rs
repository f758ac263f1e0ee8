//! Error types for the IRC grammar and the WebSocket client.
//!
//! Grammar failures ([`MessageParseError`]) and caller misuse of the client
//! ([`ClientError::MissingAddress`], [`ClientError::NotConnected`]) are
//! returned synchronously. Transport failures inside the background tasks
//! never surface here; they are logged and the owning loop keeps running.

use thiserror::Error;

use crate::transport::TransportError;

/// Convenience type alias for Results using [`ClientError`].
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Errors encountered when parsing IRC messages or prefixes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Message was empty or contained only whitespace.
    #[error("message cannot be empty or whitespace")]
    EmptyMessage,

    /// Prefix was empty or did not start with `:`.
    #[error("prefix must start with ':': {0:?}")]
    InvalidPrefix(String),

    /// A prefix or tag section was present but no command followed it.
    #[error("missing command")]
    MissingCommand,
}

/// Errors returned by [`IrcWebSocketClient`](crate::client::IrcWebSocketClient).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// No target address was configured.
    #[error("target address must be specified")]
    MissingAddress,

    /// The operation needs an open connection.
    #[error("client should be connected first")]
    NotConnected,

    /// The transport failed while the caller was waiting on it.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The caller's cancellation token fired.
    #[error("operation cancelled")]
    Cancelled,
}
