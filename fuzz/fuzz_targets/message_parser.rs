//! Fuzz target for IRC line parsing
//!
//! Feeds arbitrary input to both grammars and the prefix parser, and checks
//! that anything that parses also builds without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_ws::{IrcParser, IrcV3Parser, Prefix, Rfc1459Parser};
use std::str;

fuzz_target!(|data: &[u8]| {
    // Only fuzz valid UTF-8 strings to focus on protocol-level issues
    if let Ok(input) = str::from_utf8(data) {
        if input.len() > 4096 {
            return;
        }

        if let Ok(message) = Rfc1459Parser.parse_message(input) {
            let _ = Rfc1459Parser.build_message(Some(&message), true);
        }

        if let Ok(message) = IrcV3Parser::default().parse_message(input) {
            let _ = IrcV3Parser::default().build_message(Some(&message), false);
        }

        let _ = input.parse::<Prefix>();
    }
});
