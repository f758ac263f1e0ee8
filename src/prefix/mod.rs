//! IRC message prefix (source) types.
//!
//! The prefix grammar from RFC 1459:
//!
//! ```text
//! <prefix> ::= <servername> | <nick> [ '!' <user> ] [ '@' <host> ]
//! ```

mod parse;
mod serialize;
mod types;

pub use self::parse::parse_prefix;
pub use self::serialize::build_prefix;
pub use self::types::Prefix;
