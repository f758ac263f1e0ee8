//! The framed byte-stream boundary the client runs on.
//!
//! [`Transport`] mirrors the semantics of a client WebSocket: connect once,
//! write frames that may be fragments of one logical message, read frames
//! into a caller-owned buffer, half-close, abort, and report a
//! [`SocketState`]. [`crate::websocket::WebSocketTransport`] implements it on
//! tokio-tungstenite; tests substitute an in-memory fake.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

mod error;

pub use self::error::TransportError;

/// WebSocket close status for a normal closure.
pub const NORMAL_CLOSURE: u16 = 1000;

/// Observable state of a transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SocketState {
    /// Connect has been issued but not completed.
    Connecting = 0,
    /// Connected; frames flow both ways.
    Open = 1,
    /// A close handshake is in progress.
    Closing = 2,
    /// Closed gracefully or after a failed connect.
    Closed = 3,
    /// Torn down by [`Transport::abort`].
    Aborted = 4,
}

impl SocketState {
    /// Returns `true` for `Closed` and `Aborted`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SocketState::Closed | SocketState::Aborted)
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => SocketState::Connecting,
            1 => SocketState::Open,
            2 => SocketState::Closing,
            3 => SocketState::Closed,
            _ => SocketState::Aborted,
        }
    }
}

impl fmt::Display for SocketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SocketState::Connecting => "Connecting",
            SocketState::Open => "Open",
            SocketState::Closing => "Closing",
            SocketState::Closed => "Closed",
            SocketState::Aborted => "Aborted",
        };
        f.write_str(name)
    }
}

/// A [`SocketState`] shared between a transport and its read pump.
#[derive(Clone, Debug)]
pub(crate) struct SharedState(Arc<AtomicU8>);

impl SharedState {
    pub(crate) fn new(state: SocketState) -> Self {
        Self(Arc::new(AtomicU8::new(state as u8)))
    }

    pub(crate) fn get(&self) -> SocketState {
        SocketState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: SocketState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Move from `from` to `to`; no-op if the state is something else.
    pub(crate) fn transition(&self, from: SocketState, to: SocketState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Set `to` unless the transport was aborted.
    pub(crate) fn settle(&self, to: SocketState) {
        let _ = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current != SocketState::Aborted as u8).then_some(to as u8)
            });
    }
}

/// Kind of a received frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameKind {
    /// UTF-8 text (possibly one fragment of a larger message).
    Text,
    /// Binary payload.
    Binary,
    /// The peer started the close handshake.
    Close,
}

/// Result of one [`Transport::receive`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Received {
    /// Bytes written into the caller's buffer.
    pub count: usize,
    /// What kind of frame the bytes belong to.
    pub kind: FrameKind,
    /// Whether these bytes complete the logical message.
    pub end_of_message: bool,
}

/// A duplex framed byte stream.
///
/// Reads and writes may run concurrently; the client serializes writes
/// itself.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connect to `address`. Resolves once the transport is `Open` or failed.
    async fn connect(&self, address: &str) -> Result<(), TransportError>;

    /// Write one frame; `end_of_message` marks the final fragment.
    async fn send(&self, data: &[u8], end_of_message: bool) -> Result<(), TransportError>;

    /// Read the next chunk of inbound data into `buffer`.
    async fn receive(&self, buffer: &mut [u8]) -> Result<Received, TransportError>;

    /// Start the close handshake from our side.
    async fn close_output(&self, code: u16, reason: &str) -> Result<(), TransportError>;

    /// Tear the connection down immediately.
    fn abort(&self);

    /// Current state.
    fn state(&self) -> SocketState;
}

/// Creates fresh, unconnected transports.
///
/// The client asks for a new transport on every open and every reconnect
/// attempt.
pub trait TransportFactory: Send + Sync {
    /// Create a transport in the `Connecting`-ready state.
    fn create(&self) -> Arc<dyn Transport>;
}

impl<F> TransportFactory for F
where
    F: Fn() -> Arc<dyn Transport> + Send + Sync,
{
    fn create(&self) -> Arc<dyn Transport> {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(SocketState::Closed.is_terminal());
        assert!(SocketState::Aborted.is_terminal());
        assert!(!SocketState::Open.is_terminal());
        assert!(!SocketState::Closing.is_terminal());
    }

    #[test]
    fn test_shared_state_transitions() {
        let state = SharedState::new(SocketState::Connecting);
        assert!(!state.transition(SocketState::Open, SocketState::Closing));
        state.set(SocketState::Open);
        assert!(state.transition(SocketState::Open, SocketState::Closing));
        assert_eq!(state.get(), SocketState::Closing);
    }

    #[test]
    fn test_settle_respects_abort() {
        let state = SharedState::new(SocketState::Aborted);
        state.settle(SocketState::Closed);
        assert_eq!(state.get(), SocketState::Aborted);

        let state = SharedState::new(SocketState::Closing);
        state.settle(SocketState::Closed);
        assert_eq!(state.get(), SocketState::Closed);
    }
}
