//! Transport error types.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors raised by a [`Transport`](super::Transport).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// A WebSocket protocol or connection error.
    #[error("web socket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// A socket-level I/O error.
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport is not open.
    #[error("transport is not open")]
    NotOpen,

    /// The transport was aborted.
    #[error("transport was aborted")]
    Aborted,
}
