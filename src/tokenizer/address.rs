//! # Address and List Name Tokens
//!
//! Both lexemes are runs of word-like characters; an address is told apart by its
//! single `@`. The tokenizer tries [`parse_address`] before [`parse_identifier`] so
//! that `alice@mit.edu` is never split into a list name followed by garbage.
//!
//! | Lexeme | Characters |
//! |---|---|
//! | local part | `A-Z a-z 0-9 . _ - +` |
//! | domain | `A-Z a-z 0-9 . _ -` |
//! | list name | `A-Z a-z 0-9` |

use nom::{
    bytes::complete::take_while1,
    character::complete::char,
    combinator::{map, recognize},
    error::context,
    sequence::tuple,
};

use super::token::{ParserResult, Token};

pub fn is_local_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '+')
}

pub fn is_domain_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Parses an address literal such as `bitdiddle@mit.edu`.
///
/// Case is preserved here; addresses are lowercased when they are collected into an
/// [`AddressSet`](crate::ast::AddressSet).
///
/// # Examples
///
/// ```
/// # use norn::tokenizer::address::parse_address;
/// # use norn::tokenizer::token::Token;
/// let (rest, token) = parse_address("Ben@MIT.edu, rest").unwrap();
/// assert_eq!(token, Token::Address("Ben@MIT.edu".to_string()));
/// assert_eq!(rest, ", rest");
/// ```
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_address(input: &str) -> ParserResult<Token> {
    context(
        "address",
        map(
            recognize(tuple((
                take_while1(is_local_char),
                char('@'),
                take_while1(is_domain_char),
            ))),
            |address: &str| Token::Address(address.to_string()),
        ),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_identifier(input: &str) -> ParserResult<Token> {
    context(
        "list name",
        map(take_while1(is_name_char), |name: &str| {
            Token::Identifier(name.to_string())
        }),
    )(input)
}
