use super::super::{core::*, prelude::*};
use crate::ast::Address;
use crate::tokenizer::{
    symbol::{Delimiter, Operator},
    token::Token,
};

pub fn parse_identifier() -> impl Parser<Token, String> {
    with_context(
        satisfy(|token: &Token| match token {
            Token::Identifier(s) => Some(s.clone()),
            _ => None,
        }),
        "list name",
    )
}

/// Address literal token, already normalized. The tokenizer only admits address
/// characters, so normalization failing here means the token is not an address.
pub fn parse_address() -> impl Parser<Token, Address> {
    with_context(
        satisfy(|token: &Token| match token {
            Token::Address(raw) => Address::new(raw).ok(),
            _ => None,
        }),
        "address",
    )
}

// operators
pub fn parse_union_operator() -> impl Parser<Token, Token> {
    equal(Token::Operator(Operator::Union))
}

pub fn parse_difference_operator() -> impl Parser<Token, Token> {
    equal(Token::Operator(Operator::Difference))
}

pub fn parse_intersection_operator() -> impl Parser<Token, Token> {
    equal(Token::Operator(Operator::Intersection))
}

// delimiters
pub fn parse_semicolon() -> impl Parser<Token, Token> {
    with_context(equal(Token::Delimiter(Delimiter::Semicolon)), "semicolon")
}

pub fn parse_equal() -> impl Parser<Token, Token> {
    equal(Token::Delimiter(Delimiter::Equal))
}

pub fn parse_open_paren() -> impl Parser<Token, Token> {
    equal(Token::Delimiter(Delimiter::OpenParen))
}

pub fn parse_close_paren() -> impl Parser<Token, Token> {
    with_context(equal(Token::Delimiter(Delimiter::CloseParen)), "close paren")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_normalizes() {
        let tokens = vec![Token::Address("Bob@MIT.edu".to_string())];
        let (pos, address) = parse_address().parse(&tokens, 0).unwrap();
        assert_eq!(pos, 1);
        assert_eq!(address.as_str(), "bob@mit.edu");
    }

    #[test]
    fn test_parse_identifier() {
        let tokens = vec![
            Token::Identifier("staff".to_string()),
            Token::Address("a@b".to_string()),
        ];
        assert_eq!(
            parse_identifier().parse(&tokens, 0),
            Ok((1, "staff".to_string()))
        );
        assert!(parse_identifier().parse(&tokens, 1).is_err());
        assert!(parse_address().parse(&tokens, 0).is_err());
    }
}
