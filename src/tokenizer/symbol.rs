//! # Symbol Token Handling
//!
//! Symbols are split into two categories:
//!
//! * [`Operator`]: the three set-algebra operators
//! * [`Delimiter`]: grouping, statement separation and definition
//!
//! Every symbol is a single character, so no longest-match ordering is needed.
//! Precedence is the analyzer's concern: `*` binds tighter than `!`, which binds
//! tighter than `,`.

use strum_macros::{AsRefStr, Display, EnumString};

use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{map, value},
    error::context,
};

use super::token::{ParserResult, Token};

/// Set-algebra operators.
#[derive(Debug, Clone, PartialEq, Eq, EnumString, Display, AsRefStr)]
pub enum Operator {
    /// Union (`,`)
    #[strum(serialize = ",")]
    Union,
    /// Difference (`!`)
    #[strum(serialize = "!")]
    Difference,
    /// Intersection (`*`)
    #[strum(serialize = "*")]
    Intersection,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumString, Display, AsRefStr)]
pub enum Delimiter {
    /// Opening parenthesis (`(`) for grouping
    #[strum(serialize = "(")]
    OpenParen,
    /// Closing parenthesis (`)`) for grouping
    #[strum(serialize = ")")]
    CloseParen,
    /// Semicolon (`;`) separating statements of a sequence
    #[strum(serialize = ";")]
    Semicolon,
    /// Equal sign (`=`) binding a list name
    #[strum(serialize = "=")]
    Equal,
}

/// Parses an operator token from the input string.
///
/// # Examples
///
/// ```
/// # use norn::tokenizer::symbol::{parse_operator, Operator};
/// # use norn::tokenizer::token::Token;
/// let (rest, token) = parse_operator("! rest").unwrap();
/// assert_eq!(token, Token::Operator(Operator::Difference));
/// assert_eq!(rest, " rest");
/// ```
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_operator(input: &str) -> ParserResult<Token> {
    context(
        "operator",
        map(
            alt((
                value(Operator::Union, tag(",")),
                value(Operator::Difference, tag("!")),
                value(Operator::Intersection, tag("*")),
            )),
            Token::Operator,
        ),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_delimiter(input: &str) -> ParserResult<Token> {
    context(
        "delimiter",
        map(
            alt((
                value(Delimiter::OpenParen, tag("(")),
                value(Delimiter::CloseParen, tag(")")),
                value(Delimiter::Semicolon, tag(";")),
                value(Delimiter::Equal, tag("=")),
            )),
            Token::Delimiter,
        ),
    )(input)
}
