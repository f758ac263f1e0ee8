use super::Prefix;

/// Build the wire form of a prefix, including its leading `:`.
///
/// Returns an empty string for `None`. The nickname or server is followed by
/// `!user` and `@host` when those are non-empty.
pub fn build_prefix(prefix: Option<&Prefix>) -> String {
    let Some(prefix) = prefix else {
        return String::new();
    };

    let mut out = String::with_capacity(prefix.raw.len() + 1);
    out.push(':');
    out.push_str(prefix.name());

    if let Some(user) = prefix.user.as_deref().filter(|u| !u.is_empty()) {
        out.push('!');
        out.push_str(user);
    }
    if let Some(host) = prefix.host.as_deref().filter(|h| !h.is_empty()) {
        out.push('@');
        out.push_str(host);
    }

    out
}
