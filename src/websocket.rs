//! [`Transport`] over tokio-tungstenite.
//!
//! The stream is split on connect. A read pump task drains the read half
//! into a queue and keeps the [`SocketState`] current, so the state reaches
//! `Closed` when the peer finishes the close handshake even if nobody is
//! calling [`Transport::receive`].

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::protocol::frame::coding::{CloseCode, Data, OpCode};
use tokio_tungstenite::tungstenite::protocol::frame::Frame;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::transport::{
    FrameKind, Received, SharedState, SocketState, Transport, TransportError, TransportFactory,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Default)]
struct Outbound {
    sink: Option<SplitSink<WsStream, WsMessage>>,
    /// A fragmented message has been started and not finished.
    in_message: bool,
}

#[derive(Default)]
struct Inbound {
    queue: Option<mpsc::UnboundedReceiver<WsMessage>>,
    pending: Option<Pending>,
}

struct Pending {
    data: Vec<u8>,
    offset: usize,
    kind: FrameKind,
}

impl Pending {
    fn from_message(message: WsMessage) -> Option<Self> {
        let (data, kind) = match message {
            WsMessage::Text(text) => (text.into_bytes(), FrameKind::Text),
            WsMessage::Binary(data) => (data, FrameKind::Binary),
            WsMessage::Close(_) => (Vec::new(), FrameKind::Close),
            _ => return None,
        };
        Some(Self {
            data,
            offset: 0,
            kind,
        })
    }
}

/// A client WebSocket connection.
///
/// Single use: once closed or aborted, create a new one.
pub struct WebSocketTransport {
    state: SharedState,
    outbound: Mutex<Outbound>,
    inbound: Mutex<Inbound>,
    shutdown: CancellationToken,
}

impl WebSocketTransport {
    /// Create an unconnected transport.
    pub fn new() -> Self {
        Self {
            state: SharedState::new(SocketState::Connecting),
            outbound: Mutex::new(Outbound::default()),
            inbound: Mutex::new(Inbound::default()),
            shutdown: CancellationToken::new(),
        }
    }
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WebSocketTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocketTransport")
            .field("state", &self.state.get())
            .finish_non_exhaustive()
    }
}

impl Drop for WebSocketTransport {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn read_pump(
    mut stream: SplitStream<WsStream>,
    queue: mpsc::UnboundedSender<WsMessage>,
    state: SharedState,
    shutdown: CancellationToken,
) {
    loop {
        let next = tokio::select! {
            _ = shutdown.cancelled() => break,
            next = stream.next() => next,
        };

        match next {
            Some(Ok(message @ WsMessage::Close(_))) => {
                state.transition(SocketState::Open, SocketState::Closing);
                if queue.send(message).is_err() {
                    break;
                }
            }
            // tungstenite answers pings on its own.
            Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_))) => {}
            Some(Ok(message)) => {
                if queue.send(message).is_err() {
                    break;
                }
            }
            Some(Err(e)) => {
                debug!(error = %e, "web socket read ended");
                break;
            }
            None => break,
        }
    }

    state.settle(SocketState::Closed);
    trace!("read pump stopped");
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn connect(&self, address: &str) -> Result<(), TransportError> {
        self.state.set(SocketState::Connecting);

        let (stream, _response) = match connect_async(address).await {
            Ok(connected) => connected,
            Err(e) => {
                self.state.settle(SocketState::Closed);
                return Err(e.into());
            }
        };

        let (sink, stream) = stream.split();
        let (tx, rx) = mpsc::unbounded_channel();

        *self.outbound.lock().await = Outbound {
            sink: Some(sink),
            in_message: false,
        };
        *self.inbound.lock().await = Inbound {
            queue: Some(rx),
            pending: None,
        };

        if !self.state.transition(SocketState::Connecting, SocketState::Open) {
            return Err(TransportError::Aborted);
        }

        tokio::spawn(read_pump(
            stream,
            tx,
            self.state.clone(),
            self.shutdown.clone(),
        ));
        Ok(())
    }

    async fn send(&self, data: &[u8], end_of_message: bool) -> Result<(), TransportError> {
        if self.state.get() != SocketState::Open {
            return Err(TransportError::NotOpen);
        }

        let mut outbound = self.outbound.lock().await;
        let Outbound { sink, in_message } = &mut *outbound;
        let sink = sink.as_mut().ok_or(TransportError::NotOpen)?;

        let opcode = if *in_message {
            OpCode::Data(Data::Continue)
        } else {
            OpCode::Data(Data::Text)
        };
        let frame = Frame::message(data.to_vec(), opcode, end_of_message);
        sink.send(WsMessage::Frame(frame)).await?;
        *in_message = !end_of_message;
        Ok(())
    }

    async fn receive(&self, buffer: &mut [u8]) -> Result<Received, TransportError> {
        let mut inbound = self.inbound.lock().await;

        while inbound.pending.is_none() {
            let queue = inbound.queue.as_mut().ok_or(TransportError::NotOpen)?;
            let message = tokio::select! {
                _ = self.shutdown.cancelled() => return Err(TransportError::Aborted),
                message = queue.recv() => message,
            };
            let message = message.ok_or(TransportError::NotOpen)?;
            inbound.pending = Pending::from_message(message);
        }
        let pending = inbound.pending.as_mut().ok_or(TransportError::NotOpen)?;

        let remaining = &pending.data[pending.offset..];
        let count = remaining.len().min(buffer.len());
        buffer[..count].copy_from_slice(&remaining[..count]);
        pending.offset += count;

        let kind = pending.kind;
        let end_of_message = pending.offset >= pending.data.len();
        if end_of_message {
            inbound.pending = None;
        }

        Ok(Received {
            count,
            kind,
            end_of_message,
        })
    }

    async fn close_output(&self, code: u16, reason: &str) -> Result<(), TransportError> {
        let mut outbound = self.outbound.lock().await;
        let sink = outbound.sink.as_mut().ok_or(TransportError::NotOpen)?;

        let initiated = self.state.transition(SocketState::Open, SocketState::Closing);
        let frame = CloseFrame {
            code: CloseCode::from(code),
            reason: Cow::Owned(reason.to_owned()),
        };
        match sink.send(WsMessage::Close(Some(frame))).await {
            Ok(()) => Ok(()),
            // tungstenite has already answered the peer's close frame.
            Err(
                WsError::ConnectionClosed
                | WsError::AlreadyClosed
                | WsError::Protocol(ProtocolError::SendAfterClosing),
            ) if !initiated => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn abort(&self) {
        self.state.set(SocketState::Aborted);
        self.shutdown.cancel();
        if let Ok(mut outbound) = self.outbound.try_lock() {
            outbound.sink = None;
        }
    }

    fn state(&self) -> SocketState {
        self.state.get()
    }
}

/// Creates a fresh [`WebSocketTransport`] per connection attempt.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebSocketConnector;

impl TransportFactory for WebSocketConnector {
    fn create(&self) -> Arc<dyn Transport> {
        Arc::new(WebSocketTransport::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transport_is_connecting() {
        assert_eq!(WebSocketTransport::new().state(), SocketState::Connecting);
    }

    #[test]
    fn test_pending_skips_control_frames() {
        assert!(Pending::from_message(WsMessage::Ping(vec![1])).is_none());
        let pending = Pending::from_message(WsMessage::Text("PING".into())).unwrap();
        assert_eq!(pending.kind, FrameKind::Text);
        assert_eq!(pending.data, b"PING");
        let close = Pending::from_message(WsMessage::Close(None)).unwrap();
        assert_eq!(close.kind, FrameKind::Close);
        assert!(close.data.is_empty());
    }

    #[tokio::test]
    async fn test_send_before_connect_is_not_open() {
        let transport = WebSocketTransport::new();
        assert!(matches!(
            transport.send(b"PING", true).await,
            Err(TransportError::NotOpen)
        ));
    }

    #[tokio::test]
    async fn test_abort_is_terminal() {
        let transport = WebSocketTransport::new();
        transport.abort();
        assert_eq!(transport.state(), SocketState::Aborted);
        let mut buf = [0u8; 8];
        assert!(transport.receive(&mut buf).await.is_err());
    }

    #[test]
    fn test_drop_stops_read_pump() {
        let transport = WebSocketTransport::new();
        let shutdown = transport.shutdown.clone();
        drop(transport);
        assert!(shutdown.is_cancelled());
    }

    #[tokio::test]
    async fn test_failed_connect_closes() {
        let transport = WebSocketTransport::new();
        assert!(transport.connect("not a url").await.is_err());
        assert_eq!(transport.state(), SocketState::Closed);
    }
}
