//! # Whitespace Token Handling
//!
//! Whitespace is preserved as tokens so spans stay exact; the
//! [`TokenPreprocessor`](crate::preprocessor::TokenPreprocessor) drops them before the
//! analyzer runs. Files fed through `!load` contain newlines, so both `\n` and `\r\n`
//! are recognized.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    combinator::map,
    error::context,
};

use super::token::{ParserResult, Token};

/// Parses spaces and tabs.
///
/// # Examples
///
/// ```
/// # use norn::tokenizer::whitespace::parse_whitespace;
/// # use norn::tokenizer::token::Token;
/// let (rest, token) = parse_whitespace("   a@b.com").unwrap();
/// assert_eq!(token, Token::Whitespace("   ".to_string()));
/// assert_eq!(rest, "a@b.com");
/// ```
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_whitespace(input: &str) -> ParserResult<Token> {
    context(
        "whitespace expected",
        map(take_while1(|c| c == ' ' || c == '\t'), |ws: &str| {
            Token::Whitespace(ws.to_string())
        }),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_newline(input: &str) -> ParserResult<Token> {
    context(
        "newline expected",
        map(alt((tag("\r\n"), tag("\n"))), |_| Token::Newline),
    )(input)
}
