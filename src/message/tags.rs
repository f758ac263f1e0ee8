//! IRCv3 message tags.
//!
//! Tag values are kept exactly as they appear on the wire so that a parsed
//! line rebuilds byte-for-byte. Use [`unescape_tag_value`] to read the
//! decoded value.

use indexmap::IndexMap;

use super::nom_parser::tag_pair;

/// Tag key to raw tag value. A key without a value maps to `""`.
pub type Tags = IndexMap<String, String>;

/// Parse the tag section of a line.
///
/// `token` is the text between `@` and the first space; a leading `@` is
/// tolerated. Pieces are separated by `;` and split on their first `=`.
/// Pieces with no `=` are dropped, and a repeated key keeps its last value.
pub fn parse_tags(token: &str) -> Tags {
    let token = token.strip_prefix('@').unwrap_or(token);

    let mut tags = Tags::new();
    for piece in token.split(';') {
        if let Ok((_, (key, value))) = tag_pair(piece) {
            tags.insert(key.to_owned(), value.to_owned());
        }
    }
    tags
}

/// Build the tag section of a line, without the leading `@`.
pub fn build_tags(tags: &Tags) -> String {
    let mut out = String::new();
    for (i, (key, value)) in tags.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        out.push_str(key);
        out.push('=');
        out.push_str(value);
    }
    out
}

/// Escape a tag value for the wire.
pub fn escape_tag_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            ';' => escaped.push_str("\\:"),
            ' ' => escaped.push_str("\\s"),
            '\\' => escaped.push_str("\\\\"),
            '\r' => escaped.push_str("\\r"),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Decode an escaped tag value.
///
/// Unknown escapes drop the backslash; a lone trailing backslash is dropped.
pub fn unescape_tag_value(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some(':') => unescaped.push(';'),
            Some('s') => unescaped.push(' '),
            Some('r') => unescaped.push('\r'),
            Some('n') => unescaped.push('\n'),
            Some(other) => unescaped.push(other),
            None => break,
        }
    }
    unescaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        let tags = parse_tags("badge-info=;badges=staff/1");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags["badge-info"], "");
        assert_eq!(tags["badges"], "staff/1");
    }

    #[test]
    fn test_parse_tags_drops_bare_keys() {
        let tags = parse_tags("@flag;key=value;");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags["key"], "value");
    }

    #[test]
    fn test_parse_tags_last_value_wins() {
        let tags = parse_tags("a=1;b=2;a=3");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags["a"], "3");
    }

    #[test]
    fn test_parse_tags_keeps_raw_escapes() {
        let tags = parse_tags("system-msg=ronni\\shas\\ssubscribed");
        assert_eq!(tags["system-msg"], "ronni\\shas\\ssubscribed");
        assert_eq!(unescape_tag_value(&tags["system-msg"]), "ronni has subscribed");
    }

    #[test]
    fn test_build_tags_in_insertion_order() {
        let tags = parse_tags("badge-info=;badges=staff/1;color=#FF4500");
        assert_eq!(build_tags(&tags), "badge-info=;badges=staff/1;color=#FF4500");
        assert_eq!(build_tags(&Tags::new()), "");
    }

    #[test]
    fn test_unescape_sequences() {
        assert_eq!(unescape_tag_value("a\\:b\\sc\\\\d\\re\\nf"), "a;b c\\d\re\nf");
        assert_eq!(unescape_tag_value("test\\"), "test");
        assert_eq!(unescape_tag_value("a\\xb"), "axb");
    }

    #[test]
    fn test_escape_roundtrip() {
        for original in ["simple", "with space", "with;semicolon", "back\\slash", "complex; \\ \n \r all"] {
            let escaped = escape_tag_value(original);
            assert!(!escaped.contains(' ') && !escaped.contains(';'));
            assert_eq!(unescape_tag_value(&escaped), original);
        }
    }
}
