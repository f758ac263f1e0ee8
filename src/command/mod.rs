//! IRC command and reply identifiers.

mod types;

pub use self::types::Command;
