//! A self-healing IRC session over WebSocket.
//!
//! [`IrcWebSocketClient::open`] creates a transport and starts four
//! background tasks sharing one cancellation scope:
//!
//! - the state monitor, which turns transport state changes into
//!   [`ClientEvent`]s;
//! - the listener, which reassembles frames into lines;
//! - the reconnector, which replaces a lost transport;
//! - the pinger, which sends `PING` on the configured interval.
//!
//! All writes, including `QUIT` and `PING`, go through a single-permit
//! semaphore so frames of different messages never interleave. The listener
//! reads without taking it.
//!
//! ```no_run
//! use slirc_ws::{ClientConfig, CloseMode, IrcWebSocketClient};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> slirc_ws::Result<()> {
//! let client = IrcWebSocketClient::new(ClientConfig::new("wss://irc-ws.chat.twitch.tv:443"));
//! let mut events = client.subscribe();
//! client.open().await?;
//!
//! let cancel = CancellationToken::new();
//! client.send_str("NICK justinfan123\r\n", &cancel).await?;
//! while let Ok(event) = events.recv().await {
//!     if let Some(line) = event.received() {
//!         println!("{line}");
//!     }
//! }
//! client.close(CloseMode::Irc, &cancel).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::{broadcast, Semaphore, SemaphorePermit};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::error::{ClientError, Result};
use crate::parser::IrcParser;
use crate::transport::{SocketState, Transport, TransportFactory, NORMAL_CLOSURE};
use crate::websocket::WebSocketConnector;

mod config;
mod event;
mod tasks;

pub use self::config::ClientConfig;
pub use self::event::ClientEvent;

/// Buffered events per subscriber before the oldest are dropped.
const EVENT_CAPACITY: usize = 1024;

/// How [`IrcWebSocketClient::close`] ends the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CloseMode {
    /// Send `QUIT` and wait for the server to close the connection.
    #[default]
    Irc,
    /// Start the WebSocket close handshake.
    Websocket,
    /// Abort the transport.
    Force,
}

/// State shared between the client handle and its background tasks.
pub(crate) struct Inner {
    pub(crate) config: ClientConfig,
    factory: Arc<dyn TransportFactory>,
    transport: RwLock<Option<Arc<dyn Transport>>>,
    scope: Mutex<Option<CancellationToken>>,
    gate: RwLock<Option<Arc<Semaphore>>>,
    events: broadcast::Sender<ClientEvent>,
}

impl Inner {
    pub(crate) fn transport(&self) -> Option<Arc<dyn Transport>> {
        self.transport.read().clone()
    }

    pub(crate) fn socket_state(&self) -> Option<SocketState> {
        self.transport.read().as_ref().map(|t| t.state())
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.socket_state() == Some(SocketState::Open)
    }

    pub(crate) fn address(&self) -> &str {
        self.config.address.as_deref().unwrap_or_default()
    }

    pub(crate) fn emit(&self, event: ClientEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }

    /// Swap in a fresh transport, aborting the old one.
    pub(crate) fn replace_transport(&self) -> Arc<dyn Transport> {
        let fresh = self.factory.create();
        let old = self.transport.write().replace(fresh.clone());
        if let Some(old) = old {
            old.abort();
        }
        fresh
    }

    fn gate(&self) -> Option<Arc<Semaphore>> {
        self.gate.read().clone()
    }

    pub(crate) async fn send(&self, data: &[u8], cancel: &CancellationToken) -> Result<()> {
        if !self.is_connected() {
            return Err(ClientError::NotConnected);
        }
        let gate = self.gate().ok_or(ClientError::NotConnected)?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("send cancelled while waiting for the send gate");
            }
            permit = gate.acquire() => {
                let _permit = permit.map_err(|_| ClientError::NotConnected)?;
                self.write_frames(data).await?;
                debug!(bytes = data.len(), "message sent");
                trace!(payload = %String::from_utf8_lossy(data), "sent payload");
            }
        }

        self.emit(ClientEvent::MessageSent(data.to_vec()));
        Ok(())
    }

    async fn write_frames(&self, data: &[u8]) -> Result<()> {
        let transport = self.transport().ok_or(ClientError::NotConnected)?;
        let mut chunks = data.chunks(self.config.frame_size()).peekable();
        while let Some(chunk) = chunks.next() {
            transport.send(chunk, chunks.peek().is_none()).await?;
        }
        Ok(())
    }
}

async fn acquire<'a>(gate: &'a Semaphore, cancel: &CancellationToken) -> Result<SemaphorePermit<'a>> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ClientError::Cancelled),
        permit = gate.acquire() => permit.map_err(|_| ClientError::NotConnected),
    }
}

/// An IRC client speaking over a WebSocket.
///
/// Dropping the client stops its background tasks.
pub struct IrcWebSocketClient {
    inner: Arc<Inner>,
}

impl IrcWebSocketClient {
    /// Create a client backed by tokio-tungstenite.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, WebSocketConnector)
    }

    /// Create a client that obtains transports from `factory`.
    pub fn with_transport(config: ClientConfig, factory: impl TransportFactory + 'static) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                config,
                factory: Arc::new(factory),
                transport: RwLock::new(None),
                scope: Mutex::new(None),
                gate: RwLock::new(None),
                events,
            }),
        }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Subscribe to client events from this point on.
    ///
    /// A subscriber that falls more than 1024 events behind loses the
    /// oldest ones; other subscribers are unaffected.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.inner.events.subscribe()
    }

    /// `true` while the transport is open.
    pub fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    /// State of the current transport; `None` before the first open.
    pub fn state(&self) -> Option<SocketState> {
        self.inner.socket_state()
    }

    /// Connect and start the background tasks.
    ///
    /// Does nothing if already connected.
    ///
    /// # Errors
    ///
    /// [`ClientError::MissingAddress`] without a configured address, and
    /// [`ClientError::Transport`] if the initial connect fails. The
    /// background tasks are stopped in the latter case.
    pub async fn open(&self) -> Result<()> {
        let address = self
            .inner
            .config
            .address
            .clone()
            .filter(|a| !a.trim().is_empty())
            .ok_or(ClientError::MissingAddress)?;

        if self.inner.is_connected() {
            return Ok(());
        }

        let scope = CancellationToken::new();
        if let Some(stale) = self.inner.scope.lock().replace(scope.clone()) {
            stale.cancel();
        }
        if let Some(stale) = self.inner.gate.write().replace(Arc::new(Semaphore::new(1))) {
            stale.close();
        }
        let transport = self.inner.replace_transport();

        tokio::spawn(tasks::monitor(self.inner.clone(), scope.clone()));

        if let Err(e) = transport.connect(&address).await {
            error!(url = %address, error = %e, "initial connect failed");
            scope.cancel();
            self.inner.scope.lock().take();
            return Err(e.into());
        }

        tokio::spawn(tasks::listen(self.inner.clone(), scope.clone()));
        tokio::spawn(tasks::reconnect(self.inner.clone(), scope.clone()));
        tokio::spawn(tasks::ping(self.inner.clone(), scope));
        Ok(())
    }

    /// Stop the background tasks and end the session.
    ///
    /// Does nothing if not connected. The send gate is closed on return, so
    /// sends fail with [`ClientError::NotConnected`] until the next `open`.
    ///
    /// # Errors
    ///
    /// [`ClientError::Cancelled`] if `cancel` fires while waiting, or the
    /// transport error from `QUIT` or the close handshake.
    pub async fn close(&self, mode: CloseMode, cancel: &CancellationToken) -> Result<()> {
        if !self.inner.is_connected() {
            return Ok(());
        }

        if let Some(scope) = self.inner.scope.lock().take() {
            scope.cancel();
        }

        let result = match mode {
            CloseMode::Irc => self.close_irc(cancel).await,
            CloseMode::Websocket => self.close_websocket(cancel).await,
            CloseMode::Force => self.close_force(cancel).await,
        };

        if let Some(gate) = self.inner.gate.write().take() {
            gate.close();
        }
        info!(mode = ?mode, "closed");
        result
    }

    async fn close_irc(&self, cancel: &CancellationToken) -> Result<()> {
        self.inner.send(b"QUIT", cancel).await?;

        let gate = self.inner.gate().ok_or(ClientError::NotConnected)?;
        let _permit = acquire(&gate, cancel).await?;
        loop {
            match self.inner.socket_state() {
                Some(state) if !state.is_terminal() => {}
                _ => return Ok(()),
            }
            tokio::select! {
                _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                _ = tokio::time::sleep(self.inner.config.poll_interval) => {}
            }
        }
    }

    async fn close_websocket(&self, cancel: &CancellationToken) -> Result<()> {
        let gate = self.inner.gate().ok_or(ClientError::NotConnected)?;
        let _permit = acquire(&gate, cancel).await?;
        if let Some(transport) = self.inner.transport() {
            transport.close_output(NORMAL_CLOSURE, "").await?;
        }
        Ok(())
    }

    async fn close_force(&self, cancel: &CancellationToken) -> Result<()> {
        let gate = self.inner.gate().ok_or(ClientError::NotConnected)?;
        let _permit = acquire(&gate, cancel).await?;
        if let Some(transport) = self.inner.transport().filter(|t| t.state() == SocketState::Open) {
            transport.abort();
        }
        Ok(())
    }

    /// Send `data`, split into frames of at most `message_size` bytes.
    ///
    /// If `cancel` fires while waiting for the send gate the payload is not
    /// written, but the call still succeeds and
    /// [`ClientEvent::MessageSent`] is still emitted.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotConnected`] if the transport is not open, or the
    /// transport error from writing a frame.
    pub async fn send(&self, data: &[u8], cancel: &CancellationToken) -> Result<()> {
        self.inner.send(data, cancel).await
    }

    /// UTF-8 encode `text` and [`send`](Self::send) it.
    pub async fn send_str(&self, text: &str, cancel: &CancellationToken) -> Result<()> {
        self.inner.send(text.as_bytes(), cancel).await
    }

    /// Build `message` with `parser` and send the resulting line.
    pub async fn send_message<P: IrcParser>(
        &self,
        parser: &P,
        message: &P::Message,
        use_numeric: bool,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let line = parser.build_message(Some(message), use_numeric);
        self.send_str(&line, cancel).await
    }
}

impl Drop for IrcWebSocketClient {
    fn drop(&mut self) {
        if let Some(scope) = self.inner.scope.lock().take() {
            scope.cancel();
        }
        if let Some(transport) = self.inner.transport() {
            if !transport.state().is_terminal() {
                transport.abort();
            }
        }
    }
}

impl std::fmt::Debug for IrcWebSocketClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IrcWebSocketClient")
            .field("address", &self.inner.config.address)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_requires_address() {
        let client = IrcWebSocketClient::new(ClientConfig::default());
        assert!(matches!(client.open().await, Err(ClientError::MissingAddress)));

        let client = IrcWebSocketClient::new(ClientConfig::new("  "));
        assert!(matches!(client.open().await, Err(ClientError::MissingAddress)));
    }

    #[tokio::test]
    async fn test_send_before_open() {
        let client = IrcWebSocketClient::new(ClientConfig::new("ws://127.0.0.1:1"));
        let cancel = CancellationToken::new();
        assert!(matches!(
            client.send(b"PING", &cancel).await,
            Err(ClientError::NotConnected)
        ));
        assert_eq!(client.state(), None);
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_close_before_open_is_noop() {
        let client = IrcWebSocketClient::new(ClientConfig::new("ws://127.0.0.1:1"));
        let cancel = CancellationToken::new();
        assert!(client.close(CloseMode::Force, &cancel).await.is_ok());
    }
}
