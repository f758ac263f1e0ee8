//! IRC message types and the line grammar.

pub(crate) mod nom_parser;
mod parse;
mod serialize;
pub mod tags;
mod types;

pub(crate) use self::parse::parse_body;
pub(crate) use self::serialize::build_line;
pub use self::tags::{build_tags, escape_tag_value, parse_tags, unescape_tag_value, Tags};
pub use self::types::{Message, TaggedMessage};
