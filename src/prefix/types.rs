use std::fmt;
use std::str::FromStr;

use crate::error::MessageParseError;

/// The origin of a message: either a server or a `nick!user@host` user mask.
///
/// Exactly one of `server` and `nick` is set. `user` and `host` are only set
/// alongside `nick`, and only when their delimiter was present.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prefix {
    /// Text between the leading `:` and the first space.
    pub raw: String,
    /// Server name, for server-shaped prefixes.
    pub server: Option<String>,
    /// Nickname, for user-shaped prefixes.
    pub nick: Option<String>,
    /// Username, present when a `!` delimiter was found.
    pub user: Option<String>,
    /// Hostname, present when a `@` delimiter was found.
    pub host: Option<String>,
}

impl Prefix {
    /// Build a server-shaped prefix.
    pub fn server(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            raw: name.clone(),
            server: Some(name),
            ..Self::default()
        }
    }

    /// Build a user-shaped prefix. Empty `user`/`host` are left unset.
    pub fn user(nick: impl Into<String>, user: Option<&str>, host: Option<&str>) -> Self {
        let nick = nick.into();
        let user = user.filter(|u| !u.is_empty()).map(str::to_owned);
        let host = host.filter(|h| !h.is_empty()).map(str::to_owned);

        let mut raw = nick.clone();
        if let Some(user) = &user {
            raw.push('!');
            raw.push_str(user);
        }
        if let Some(host) = &host {
            raw.push('@');
            raw.push_str(host);
        }

        Self {
            raw,
            server: None,
            nick: Some(nick),
            user,
            host,
        }
    }

    /// Returns `true` if this prefix names a server.
    pub fn is_server(&self) -> bool {
        self.server.is_some()
    }

    /// The server name or nickname, whichever is set.
    pub fn name(&self) -> &str {
        self.server
            .as_deref()
            .or(self.nick.as_deref())
            .unwrap_or_default()
    }
}

impl FromStr for Prefix {
    type Err = MessageParseError;

    /// Parses a token that includes its leading `:`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::parse::parse_prefix(s)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&super::serialize::build_prefix(Some(self)))
    }
}
