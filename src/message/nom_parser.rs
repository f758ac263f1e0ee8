//! Nom-based token recognizers for the IRC line grammar.
//!
//! These only carve out the `@tags` and `:prefix` tokens and single tag
//! pieces. The parameter split is positional and lives in `parse.rs`.

use nom::{
    bytes::complete::take_till,
    character::complete::char,
    combinator::rest,
    error::{context, VerboseError},
    sequence::{preceded, separated_pair},
    IResult,
};

type ParseResult<I, O> = IResult<I, O, VerboseError<I>>;

/// Recognize `@tags`, returning the text between `@` and the first space.
pub(crate) fn tags_token(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing IRCv3 message tags",
        preceded(char('@'), take_till(|c: char| c == ' ')),
    )(input)
}

/// Recognize `:prefix`, returning the text between `:` and the first space.
pub(crate) fn prefix_token(input: &str) -> ParseResult<&str, &str> {
    context(
        "parsing message prefix",
        preceded(char(':'), take_till(|c: char| c == ' ')),
    )(input)
}

/// Split one tag piece on its first `=`.
pub(crate) fn tag_pair(input: &str) -> ParseResult<&str, (&str, &str)> {
    context(
        "parsing tag key/value",
        separated_pair(take_till(|c: char| c == '='), char('='), rest),
    )(input)
}
