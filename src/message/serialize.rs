use crate::prefix::build_prefix;

use super::Message;

/// Build the RFC 1459 line for `message`, CRLF included.
///
/// Parameters are written exactly as stored, so a trailing parameter keeps
/// the `:` it was parsed with.
pub(crate) fn build_line(message: &Message, use_numeric: bool) -> String {
    let mut line = String::with_capacity(message.raw.len() + 2);

    if message.prefix.is_some() {
        line.push_str(&build_prefix(message.prefix.as_ref()));
        line.push(' ');
    }

    line.push_str(&message.command.to_wire(use_numeric));

    for parameter in &message.parameters {
        line.push(' ');
        line.push_str(parameter);
    }

    line.push_str("\r\n");
    line
}
