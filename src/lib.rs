//! # slirc-ws
//!
//! IRC message grammar (RFC 1459 with IRCv3 message tags) and a WebSocket
//! client session that keeps itself connected.
//!
//! ## Features
//!
//! - Parsing and building of IRC lines, prefixes and tag sections
//! - A complete command and numeric reply table
//! - An async client with keepalive, reconnection and three close modes
//! - A pluggable [`Transport`] boundary, with a tokio-tungstenite default
//! - Optional `serde` support for the data types

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ### Parsing IRC Messages
//!
//! ```rust
//! use slirc_ws::{Command, IrcParser, IrcV3Parser};
//!
//! let parser = IrcV3Parser::default();
//! let raw = "@badge-info=;badges=staff/1 :server PRIVMSG #chan :hi\r\n";
//! let message = parser.parse_message(raw).expect("valid IRC message");
//!
//! assert_eq!(message.tag("badges"), Some("staff/1"));
//! assert_eq!(message.message.command, Command::PRIVMSG);
//! assert_eq!(parser.build_message(Some(&message), false), raw);
//! ```
//!
//! ### Building IRC Messages
//!
//! ```rust
//! use slirc_ws::{Command, Message, Prefix};
//!
//! let reply = Message::new(Command::RPL_YOURHOST, ["justinfan123", ":Your host is tmi.twitch.tv"])
//!     .with_prefix(Prefix::server("tmi.twitch.tv"));
//!
//! assert_eq!(
//!     reply.to_string(),
//!     ":tmi.twitch.tv RPL_YOURHOST justinfan123 :Your host is tmi.twitch.tv\r\n"
//! );
//! ```

pub mod client;
pub mod command;
pub mod error;
pub mod message;
pub mod parser;
pub mod prefix;
pub mod transport;
pub mod websocket;

pub use self::client::{ClientConfig, ClientEvent, CloseMode, IrcWebSocketClient};
pub use self::command::Command;
pub use self::error::{ClientError, MessageParseError, Result};
pub use self::message::{Message, TaggedMessage, Tags};
pub use self::parser::{IrcParser, IrcV3Parser, Rfc1459Parser};
pub use self::prefix::Prefix;
pub use self::transport::{
    FrameKind, Received, SocketState, Transport, TransportError, TransportFactory,
};
pub use self::websocket::{WebSocketConnector, WebSocketTransport};
