use crate::error::MessageParseError;
use crate::message::nom_parser;

use super::Prefix;

/// Parse a prefix token, including its leading `:`.
///
/// Anything after the first space is ignored, so a whole line may be passed.
pub fn parse_prefix(token: &str) -> Result<Prefix, MessageParseError> {
    if token.trim().is_empty() {
        return Err(MessageParseError::InvalidPrefix(token.to_owned()));
    }

    let raw = match nom_parser::prefix_token(token) {
        Ok((_, raw)) => raw,
        Err(_) => return Err(MessageParseError::InvalidPrefix(token.to_owned())),
    };

    let bang = raw.find('!');
    let at = raw.find('@');

    let prefix = match (bang, at) {
        (Some(bang), Some(at)) if bang < at => Prefix {
            raw: raw.to_owned(),
            server: None,
            nick: Some(raw[..bang].to_owned()),
            user: Some(raw[bang + 1..at].to_owned()),
            host: Some(raw[at + 1..].to_owned()),
        },
        (Some(bang), None) => Prefix {
            raw: raw.to_owned(),
            server: None,
            nick: Some(raw[..bang].to_owned()),
            user: Some(raw[bang + 1..].to_owned()),
            host: None,
        },
        // `@` before `!`: the host swallows the rest.
        (_, Some(at)) => Prefix {
            raw: raw.to_owned(),
            server: None,
            nick: Some(raw[..at].to_owned()),
            user: None,
            host: Some(raw[at + 1..].to_owned()),
        },
        (None, None) => Prefix {
            raw: raw.to_owned(),
            server: Some(raw.to_owned()),
            nick: None,
            user: None,
            host: None,
        },
    };

    Ok(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_user_mask() {
        let prefix = parse_prefix(":nick!user@host CMD").unwrap();
        assert_eq!(prefix.raw, "nick!user@host");
        assert_eq!(prefix.nick.as_deref(), Some("nick"));
        assert_eq!(prefix.user.as_deref(), Some("user"));
        assert_eq!(prefix.host.as_deref(), Some("host"));
        assert_eq!(prefix.server, None);
    }

    #[test]
    fn test_nick_and_user() {
        let prefix = parse_prefix(":nick!user CMD").unwrap();
        assert_eq!(prefix.nick.as_deref(), Some("nick"));
        assert_eq!(prefix.user.as_deref(), Some("user"));
        assert_eq!(prefix.host, None);
    }

    #[test]
    fn test_nick_and_host() {
        let prefix = parse_prefix(":nick@host CMD").unwrap();
        assert_eq!(prefix.nick.as_deref(), Some("nick"));
        assert_eq!(prefix.user, None);
        assert_eq!(prefix.host.as_deref(), Some("host"));
    }

    #[test]
    fn test_server() {
        let prefix = parse_prefix(":server.name CMD").unwrap();
        assert_eq!(prefix.raw, "server.name");
        assert_eq!(prefix.server.as_deref(), Some("server.name"));
        assert_eq!(prefix.nick, None);
    }

    #[test]
    fn test_delimiters_after_space_are_ignored() {
        let prefix = parse_prefix(":tmi.twitch.tv PRIVMSG #c :a!b@c").unwrap();
        assert_eq!(prefix.server.as_deref(), Some("tmi.twitch.tv"));
    }

    #[test]
    fn test_host_before_bang() {
        let prefix = parse_prefix(":nick@host!x").unwrap();
        assert_eq!(prefix.nick.as_deref(), Some("nick"));
        assert_eq!(prefix.host.as_deref(), Some("host!x"));
        assert_eq!(prefix.user, None);
    }

    #[test]
    fn test_rejects_missing_marker() {
        for input in ["PING :tmi.twitch.tv\r\n", "", " ", "  ", "\t", "\r", "\n", "\r\n"] {
            assert!(
                matches!(parse_prefix(input), Err(MessageParseError::InvalidPrefix(_))),
                "expected failure for {:?}",
                input
            );
        }
    }
}
