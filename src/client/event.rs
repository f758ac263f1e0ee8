//! Events broadcast by the client.

use std::borrow::Cow;

use crate::transport::SocketState;

/// A lifecycle or data notification.
///
/// Every subscriber gets its own copy; see
/// [`IrcWebSocketClient::subscribe`](super::IrcWebSocketClient::subscribe).
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ClientEvent {
    /// The transport became open.
    Connected { address: String },
    /// The transport left the open state.
    Disconnected { address: String },
    /// The observed transport state changed.
    StateChanged { old: SocketState, new: SocketState },
    /// One complete inbound line, without its CRLF.
    MessageReceived(String),
    /// An outbound payload, as handed to `send`.
    MessageSent(Vec<u8>),
}

impl ClientEvent {
    /// The received line, if this is a [`ClientEvent::MessageReceived`].
    pub fn received(&self) -> Option<&str> {
        match self {
            ClientEvent::MessageReceived(line) => Some(line),
            _ => None,
        }
    }

    /// The sent payload as text, if this is a [`ClientEvent::MessageSent`].
    pub fn sent_text(&self) -> Option<Cow<'_, str>> {
        match self {
            ClientEvent::MessageSent(data) => Some(String::from_utf8_lossy(data)),
            _ => None,
        }
    }
}
