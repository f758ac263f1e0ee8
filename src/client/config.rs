//! Client configuration.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default frame size in bytes, for both reads and chunked writes.
pub const DEFAULT_MESSAGE_SIZE: usize = 512;

/// Default period of every waiting loop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Default pause between failed reconnect attempts.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Settings for [`IrcWebSocketClient`](super::IrcWebSocketClient).
///
/// ```
/// use std::time::Duration;
/// use slirc_ws::ClientConfig;
///
/// let config = ClientConfig::new("wss://irc-ws.chat.twitch.tv:443")
///     .with_ping_interval(Duration::from_secs(60))
///     .with_auto_reconnect(false);
/// assert_eq!(config.message_size, 512);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ClientConfig {
    /// WebSocket URL to connect to. Required by `open`.
    pub address: Option<String>,
    /// Receive buffer size and maximum outbound frame size.
    pub message_size: usize,
    /// Keepalive period. Zero disables the pinger.
    pub ping_interval: Duration,
    /// Recreate the transport whenever the connection is lost.
    pub auto_reconnect: bool,
    /// How long waiting loops sleep between checks.
    pub poll_interval: Duration,
    /// Backoff after a reconnect attempt that did not connect.
    pub reconnect_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: None,
            message_size: DEFAULT_MESSAGE_SIZE,
            ping_interval: Duration::ZERO,
            auto_reconnect: true,
            poll_interval: DEFAULT_POLL_INTERVAL,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

impl ClientConfig {
    /// Defaults with the given address.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ..Self::default()
        }
    }

    /// Set the WebSocket URL.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set the frame size; `0` is treated as `1`.
    pub fn with_message_size(mut self, size: usize) -> Self {
        self.message_size = size;
        self
    }

    /// Set the keepalive period; zero disables it.
    pub fn with_ping_interval(mut self, interval: Duration) -> Self {
        self.ping_interval = interval;
        self
    }

    /// Reconnect automatically after the connection drops.
    pub fn with_auto_reconnect(mut self, enabled: bool) -> Self {
        self.auto_reconnect = enabled;
        self
    }

    /// Set how often the background loops check for work.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the backoff between failed reconnect attempts.
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Frame size actually used; never zero.
    pub(crate) fn frame_size(&self) -> usize {
        self.message_size.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.address, None);
        assert_eq!(config.message_size, 512);
        assert_eq!(config.ping_interval, Duration::ZERO);
        assert!(config.auto_reconnect);
        assert_eq!(config.poll_interval, Duration::from_millis(200));
        assert_eq!(config.reconnect_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_zero_message_size_is_clamped() {
        assert_eq!(ClientConfig::default().with_message_size(0).frame_size(), 1);
    }
}
