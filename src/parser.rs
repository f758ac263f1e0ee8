//! The RFC 1459 and IRCv3 line grammars.
//!
//! ```text
//! <message>  ::= ['@' <tags> <SPACE>] [':' <prefix> <SPACE>] <command> <params> <crlf>
//! <command>  ::= <letter> { <letter> } | <number> <number> <number>
//! <params>   ::= <SPACE> [ ':' <trailing> | <middle> <params> ]
//! ```
//!
//! [`IrcV3Parser`] handles the tag section itself and hands the remainder of
//! the line to the [`Rfc1459Parser`] it wraps.

use crate::error::MessageParseError;
use crate::message::{self, nom_parser, parse_tags, Message, TaggedMessage};
use crate::prefix::{self, Prefix};

/// Parse and build one message flavour.
pub trait IrcParser {
    /// The message type this grammar produces.
    type Message;

    /// Parse one line, with or without its CRLF.
    ///
    /// # Errors
    ///
    /// [`MessageParseError::EmptyMessage`] for empty or whitespace-only
    /// input, [`MessageParseError::InvalidPrefix`] and
    /// [`MessageParseError::MissingCommand`] for a line with a prefix or tag
    /// section but nothing after it.
    fn parse_message(&self, line: &str) -> Result<Self::Message, MessageParseError>;

    /// Parse a `:prefix` token. Text after the first space is ignored.
    fn parse_prefix(&self, token: &str) -> Result<Prefix, MessageParseError> {
        prefix::parse_prefix(token)
    }

    /// Build the CRLF-terminated line for `message`; `""` for `None`.
    ///
    /// With `use_numeric`, replies are written as their three-digit code.
    fn build_message(&self, message: Option<&Self::Message>, use_numeric: bool) -> String;

    /// Build a `:prefix` token; `""` for `None`.
    fn build_prefix(&self, prefix: Option<&Prefix>) -> String {
        prefix::build_prefix(prefix)
    }
}

/// RFC 1459 grammar without tags.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rfc1459Parser;

impl IrcParser for Rfc1459Parser {
    type Message = Message;

    fn parse_message(&self, line: &str) -> Result<Message, MessageParseError> {
        if line.trim().is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }
        message::parse_body(line, line)
    }

    fn build_message(&self, message: Option<&Message>, use_numeric: bool) -> String {
        message
            .map(|m| message::build_line(m, use_numeric))
            .unwrap_or_default()
    }
}

/// IRCv3 grammar: an optional `@tags` section in front of an RFC 1459 line.
#[derive(Clone, Copy, Debug, Default)]
pub struct IrcV3Parser {
    base: Rfc1459Parser,
}

impl IrcV3Parser {
    /// Wrap an RFC 1459 grammar.
    pub fn new(base: Rfc1459Parser) -> Self {
        Self { base }
    }
}

impl IrcParser for IrcV3Parser {
    type Message = TaggedMessage;

    fn parse_message(&self, line: &str) -> Result<TaggedMessage, MessageParseError> {
        if line.trim().is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }

        let Ok((rest, token)) = nom_parser::tags_token(line) else {
            return self.base.parse_message(line).map(TaggedMessage::new);
        };

        let body = rest.strip_prefix(' ').unwrap_or(rest);
        if body.trim().is_empty() {
            return Err(MessageParseError::MissingCommand);
        }

        Ok(TaggedMessage {
            tags: parse_tags(token),
            message: message::parse_body(line, body)?,
        })
    }

    fn build_message(&self, message: Option<&TaggedMessage>, use_numeric: bool) -> String {
        let Some(message) = message else {
            return String::new();
        };

        let line = self.base.build_message(Some(&message.message), use_numeric);
        match message.tag_section() {
            Some(tags) => format!("@{} {}", tags, line),
            None => line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;

    #[test]
    fn test_rejects_empty_input() {
        for input in ["", " ", "  ", "\t", "\r", "\n", "\r\n"] {
            assert_eq!(
                Rfc1459Parser.parse_message(input),
                Err(MessageParseError::EmptyMessage)
            );
            assert_eq!(
                IrcV3Parser::default().parse_message(input),
                Err(MessageParseError::EmptyMessage)
            );
        }
    }

    #[test]
    fn test_parse_is_pure() {
        let line = ":nick!user@host PRIVMSG #chan :hello world\r\n";
        assert_eq!(
            Rfc1459Parser.parse_message(line).unwrap(),
            Rfc1459Parser.parse_message(line).unwrap()
        );
    }

    #[test]
    fn test_build_none() {
        assert_eq!(Rfc1459Parser.build_message(None, false), "");
        assert_eq!(IrcV3Parser::default().build_message(None, true), "");
        assert_eq!(Rfc1459Parser.build_prefix(None), "");
    }

    #[test]
    fn test_v3_without_tags_delegates() {
        let message = IrcV3Parser::default()
            .parse_message("PING :tmi.twitch.tv\r\n")
            .unwrap();
        assert!(message.tags.is_empty());
        assert_eq!(message.message.command, Command::PING);
        assert_eq!(message.raw(), "PING :tmi.twitch.tv\r\n");
    }

    #[test]
    fn test_v3_tags_without_prefix() {
        let message = IrcV3Parser::default()
            .parse_message("@id=1 PRIVMSG #chan :hi\r\n")
            .unwrap();
        assert_eq!(message.tag("id"), Some("1"));
        assert_eq!(message.message.prefix, None);
        assert_eq!(message.message.command, Command::PRIVMSG);
        assert_eq!(message.message.parameters, vec!["#chan", ":hi"]);
    }

    #[test]
    fn test_v3_tags_only_is_missing_command() {
        assert_eq!(
            IrcV3Parser::default().parse_message("@a=b"),
            Err(MessageParseError::MissingCommand)
        );
        assert_eq!(
            IrcV3Parser::default().parse_message("@a=b \r\n"),
            Err(MessageParseError::MissingCommand)
        );
    }

    #[test]
    fn test_v3_empty_tag_map_builds_plain_line() {
        let message = TaggedMessage::new(Message::new(Command::NICK, ["justinfan123"]));
        assert_eq!(
            IrcV3Parser::default().build_message(Some(&message), false),
            "NICK justinfan123\r\n"
        );
    }
}
