use std::fmt;
use std::str::FromStr;

use crate::command::Command;
use crate::error::MessageParseError;
use crate::parser::{IrcParser, IrcV3Parser, Rfc1459Parser};
use crate::prefix::Prefix;

use super::serialize::build_line;
use super::tags::{build_tags, unescape_tag_value, Tags};

/// An RFC 1459 message.
///
/// `raw` is the line as received, or the line that building will produce
/// for messages assembled with [`Message::new`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// The original wire line.
    pub raw: String,
    /// Message origin, if the line began with `:`.
    pub prefix: Option<Prefix>,
    /// Resolved command; [`Command::Unknown`] when unresolved.
    pub command: Command,
    /// Parameters in wire order. A trailing parameter keeps its leading `:`.
    pub parameters: Vec<String>,
}

impl Message {
    /// Assemble a message from a command and its parameters.
    pub fn new<I, S>(command: Command, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut message = Self {
            raw: String::new(),
            prefix: None,
            command,
            parameters: parameters.into_iter().map(Into::into).collect(),
        };
        message.raw = build_line(&message, false);
        message
    }

    /// Attach a prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = Some(prefix);
        self.raw = build_line(&self, false);
        self
    }

    /// Returns `true` if the raw line carries a `" :"` trailing boundary.
    pub fn has_trailing(&self) -> bool {
        self.raw.find(" :").map_or(false, |idx| idx > 0)
    }

    /// The last parameter with its `:` marker stripped, if it is a trailing one.
    pub fn trailing(&self) -> Option<&str> {
        if !self.has_trailing() {
            return None;
        }
        self.parameters.last().and_then(|p| p.strip_prefix(':'))
    }
}

impl FromStr for Message {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rfc1459Parser.parse_message(s)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&build_line(self, false))
    }
}

/// An IRCv3 message: an RFC 1459 message plus its tag map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaggedMessage {
    /// Tags in wire order. Values are stored unescaped-as-received.
    pub tags: Tags,
    /// The untagged part. Its `raw` holds the full line, tags included.
    pub message: Message,
}

impl TaggedMessage {
    /// Wrap a message with no tags.
    pub fn new(message: Message) -> Self {
        Self {
            tags: Tags::new(),
            message,
        }
    }

    /// Add or replace a tag. `value` is stored as given.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self.message.raw = IrcV3Parser::default().build_message(Some(&self), false);
        self
    }

    /// Raw value of a tag.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Decoded value of a tag.
    pub fn tag_unescaped(&self, key: &str) -> Option<String> {
        self.tag(key).map(unescape_tag_value)
    }

    /// The original wire line.
    pub fn raw(&self) -> &str {
        &self.message.raw
    }

    pub(crate) fn tag_section(&self) -> Option<String> {
        (!self.tags.is_empty()).then(|| build_tags(&self.tags))
    }
}

impl From<Message> for TaggedMessage {
    fn from(message: Message) -> Self {
        Self::new(message)
    }
}

impl FromStr for TaggedMessage {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IrcV3Parser::default().parse_message(s)
    }
}

impl fmt::Display for TaggedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&IrcV3Parser::default().build_message(Some(self), false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_trailing() {
        let message: Message = "PING :tmi.twitch.tv\r\n".parse().unwrap();
        assert!(message.has_trailing());
        assert_eq!(message.trailing(), Some("tmi.twitch.tv"));

        let message: Message = ":ronni!ronni@ronni.tmi.twitch.tv JOIN #dallas\r\n".parse().unwrap();
        assert!(!message.has_trailing());
        assert_eq!(message.trailing(), None);
    }

    #[test]
    fn test_new_sets_raw() {
        let message = Message::new(Command::PRIVMSG, ["#chan", ":hello there"]);
        assert_eq!(message.raw, "PRIVMSG #chan :hello there\r\n");
        assert_eq!(message.to_string(), message.raw);
    }

    #[test]
    fn test_with_tag_updates_raw() {
        let message = TaggedMessage::new(Message::new(Command::PRIVMSG, ["#chan", ":hi"]))
            .with_tag("msgid", "abc")
            .with_tag("flags", "");
        assert_eq!(message.raw(), "@msgid=abc;flags= PRIVMSG #chan :hi\r\n");
        assert_eq!(message.tag("flags"), Some(""));
        assert_eq!(message.tag("missing"), None);
    }

    #[test]
    fn test_tag_unescaped() {
        let message: TaggedMessage = "@system-msg=a\\sb :tmi.twitch.tv USERNOTICE #c\r\n"
            .parse()
            .unwrap();
        assert_eq!(message.tag_unescaped("system-msg").as_deref(), Some("a b"));
    }
}
