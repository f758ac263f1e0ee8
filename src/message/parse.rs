use crate::command::Command;
use crate::error::MessageParseError;
use crate::prefix::parse_prefix;

use super::Message;

/// RFC 1459 2.3: prefix, command and up to three middle parameters; the
/// fifth part keeps whatever follows verbatim.
const MAX_PARTS: usize = 5;

/// Split a line into prefix/command/parameter tokens.
///
/// Tokens are separated by single spaces, so runs of spaces yield empty
/// tokens. When the line contains `" :"` after its first character, the
/// split stops at that boundary and the rest, colon included, becomes the
/// final token. Otherwise the line is split into at most [`MAX_PARTS`].
/// Trailing whitespace is dropped before splitting.
pub(crate) fn split_parts(line: &str) -> Vec<&str> {
    let limit = match line.find(" :") {
        Some(idx) if idx > 0 => line[..=idx].split(' ').count(),
        _ => MAX_PARTS,
    };

    line.trim_end().splitn(limit, ' ').collect()
}

/// Parse a tag-free `body`, recording `raw` as the original line.
pub(crate) fn parse_body(raw: &str, body: &str) -> Result<Message, MessageParseError> {
    let mut parts = split_parts(body).into_iter();

    let prefix = if body.starts_with(':') {
        let token = parts.next().ok_or(MessageParseError::MissingCommand)?;
        Some(parse_prefix(token)?)
    } else {
        None
    };

    let command = parts.next().ok_or(MessageParseError::MissingCommand)?;

    Ok(Message {
        raw: raw.to_owned(),
        prefix,
        command: Command::resolve(command),
        parameters: parts.map(str::to_owned).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_trailing_boundary() {
        assert_eq!(
            split_parts(":tmi.twitch.tv 002 justinfan123 :Your host is tmi.twitch.tv\r\n"),
            vec![":tmi.twitch.tv", "002", "justinfan123", ":Your host is tmi.twitch.tv"]
        );
        assert_eq!(split_parts("PING :tmi.twitch.tv\r\n"), vec!["PING", ":tmi.twitch.tv"]);
    }

    #[test]
    fn test_split_without_trailing() {
        assert_eq!(split_parts("JOIN #dallas\r\n"), vec!["JOIN", "#dallas"]);
        assert_eq!(split_parts("PING"), vec!["PING"]);
    }

    #[test]
    fn test_split_caps_at_five_parts() {
        // More than three middle parameters without a trailing marker: the
        // fifth part absorbs the remainder unsplit.
        assert_eq!(
            split_parts(":srv MODE #chan +ov alice bob"),
            vec![":srv", "MODE", "#chan", "+ov", "alice bob"]
        );
        assert_eq!(split_parts("USER guest 0 * real name"), vec!["USER", "guest", "0", "*", "real name"]);
    }

    #[test]
    fn test_split_keeps_empty_tokens() {
        assert_eq!(split_parts("A  B"), vec!["A", "", "B"]);
    }

    #[test]
    fn test_split_leading_trailing_marker_is_not_a_boundary() {
        assert_eq!(split_parts(" :x"), vec!["", ":x"]);
    }

    #[test]
    fn test_parse_body_requires_command() {
        assert_eq!(
            parse_body(":server", ":server"),
            Err(MessageParseError::MissingCommand)
        );
    }
}
