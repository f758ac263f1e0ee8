//! The four background loops started by `open`.
//!
//! Each loop runs until its scope token is cancelled and checks the token at
//! every suspension point. Errors inside a loop are logged and the loop
//! carries on.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use super::{ClientEvent, Inner};
use crate::transport::{FrameKind, Received, SocketState, Transport, NORMAL_CLOSURE};

const PING: &[u8] = b"PING";

/// Sleep for `period`; `false` if the scope was cancelled first.
async fn pause(scope: &CancellationToken, period: Duration) -> bool {
    tokio::select! {
        _ = scope.cancelled() => false,
        _ = tokio::time::sleep(period) => true,
    }
}

/// Split reassembled text into non-empty lines on CR and LF.
pub(crate) fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.trim_end_matches('\0')
        .split(|c: char| c == '\r' || c == '\n')
        .filter(|line| !line.is_empty())
}

pub(super) async fn monitor(inner: Arc<Inner>, scope: CancellationToken) {
    let mut connected = inner.is_connected();
    let mut state = inner.socket_state().unwrap_or(SocketState::Connecting);

    info!(url = %inner.address(), "connecting");
    inner.emit(ClientEvent::StateChanged {
        old: state,
        new: state,
    });

    loop {
        if inner.is_connected() == connected {
            if !pause(&scope, inner.config.poll_interval).await {
                break;
            }
            continue;
        }

        let current = inner.socket_state().unwrap_or(SocketState::Closed);
        info!(from = %state, to = %current, "connection state changed");
        inner.emit(ClientEvent::StateChanged {
            old: state,
            new: current,
        });

        connected = current == SocketState::Open;
        state = current;

        let address = inner.address().to_owned();
        if connected {
            info!(url = %address, "connected");
            inner.emit(ClientEvent::Connected { address });
        } else {
            info!(url = %address, "disconnected");
            inner.emit(ClientEvent::Disconnected { address });
        }
    }

    info!(task = "monitor", "task cancelled");
}

/// Whether `a` and `b` are the same transport instance.
fn same_transport(a: &Arc<dyn Transport>, b: &Arc<dyn Transport>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

pub(super) async fn listen(inner: Arc<Inner>, scope: CancellationToken) {
    let mut buffer = vec![0u8; inner.config.frame_size()];
    let mut accumulated: Vec<u8> = Vec::new();
    let mut current: Option<Arc<dyn Transport>> = None;
    // Set once a closed transport has handed over everything it queued.
    let mut drained = false;

    loop {
        let Some(transport) = inner.transport() else {
            if !pause(&scope, inner.config.poll_interval).await {
                break;
            }
            continue;
        };

        if !current
            .as_ref()
            .is_some_and(|seen| same_transport(seen, &transport))
        {
            if !accumulated.is_empty() {
                debug!(
                    bytes = accumulated.len(),
                    "discarding partial message from previous connection"
                );
                accumulated.clear();
            }
            drained = false;
            current = Some(Arc::clone(&transport));
        }

        let readable = match transport.state() {
            SocketState::Open | SocketState::Closing => true,
            SocketState::Closed => !drained,
            SocketState::Connecting | SocketState::Aborted => false,
        };
        if !readable {
            if !pause(&scope, inner.config.poll_interval).await {
                break;
            }
            continue;
        }

        let received = tokio::select! {
            _ = scope.cancelled() => break,
            received = transport.receive(&mut buffer) => received,
        };

        match received {
            Ok(Received {
                kind: FrameKind::Close,
                ..
            }) => {
                debug!("close frame received");
                if let Err(e) = transport.close_output(NORMAL_CLOSURE, "").await {
                    error!(error = %e, "failed to acknowledge close");
                }
            }
            Ok(Received {
                kind: FrameKind::Text,
                count,
                end_of_message: false,
            }) => {
                accumulated.extend_from_slice(&buffer[..count]);
                debug!(bytes = count, "partial message received");
            }
            Ok(Received {
                kind: FrameKind::Text,
                count,
                end_of_message: true,
            }) => {
                accumulated.extend_from_slice(&buffer[..count]);
                debug!(bytes = accumulated.len(), "message received");
                {
                    let text = String::from_utf8_lossy(&accumulated);
                    trace!(payload = %text, "received payload");
                    for line in split_lines(&text) {
                        inner.emit(ClientEvent::MessageReceived(line.to_owned()));
                    }
                }
                accumulated.clear();
            }
            Ok(Received {
                kind: FrameKind::Binary,
                count,
                ..
            }) => {
                debug!(bytes = count, "binary frame ignored");
            }
            Err(e) => {
                if transport.state().is_terminal() {
                    drained = true;
                    debug!(error = %e, "receive queue drained");
                } else {
                    error!(error = %e, "web socket receive failed");
                }
                if !pause(&scope, inner.config.poll_interval).await {
                    break;
                }
            }
        }
    }

    info!(task = "listener", "task cancelled");
}

pub(super) async fn reconnect(inner: Arc<Inner>, scope: CancellationToken) {
    loop {
        if !inner.config.auto_reconnect || inner.is_connected() {
            if !pause(&scope, inner.config.poll_interval).await {
                break;
            }
            continue;
        }

        info!(url = %inner.address(), "reconnecting");
        let transport = inner.replace_transport();
        let attempt = tokio::select! {
            _ = scope.cancelled() => break,
            attempt = transport.connect(inner.address()) => attempt,
        };
        if let Err(e) = attempt {
            error!(error = %e, "reconnect attempt failed");
        }

        if !inner.is_connected() {
            if !pause(&scope, inner.config.reconnect_delay).await {
                break;
            }
            info!("unable to reconnect, retrying");
        }
    }

    info!(task = "reconnector", "task cancelled");
}

pub(super) async fn ping(inner: Arc<Inner>, scope: CancellationToken) {
    loop {
        let interval = inner.config.ping_interval;
        if interval.is_zero() {
            if !pause(&scope, inner.config.poll_interval).await {
                break;
            }
            continue;
        }

        if inner.is_connected() {
            if let Err(e) = inner.send(PING, &scope).await {
                error!(error = %e, "keepalive failed");
            }
        }

        if !pause(&scope, interval).await {
            break;
        }
    }

    info!(task = "pinger", "task cancelled");
}
