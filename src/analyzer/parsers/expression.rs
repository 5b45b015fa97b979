//! # List Expression Grammar
//!
//! From loosest to tightest binding:
//!
//! ```text
//! sequence     = definition (';' definition)*
//! definition   = (name '=')? union
//! union        = difference (',' difference)*
//! difference   = intersection ('!' intersection)*
//! intersection = list ('*' list)*
//! list         = address | name | '(' sequence ')' | <empty>
//! ```
//!
//! Every chain folds left-to-right into a left-leaning tree. An empty operand
//! position is an empty address literal.
//!
//! Groups recurse through the parser, so [`check_nesting`] bounds them before
//! parsing starts; folds refuse to build trees deeper than [`MAX_DEPTH`].

use super::super::{core::*, prelude::*};
use super::common::*;
use crate::ast::{Address, AddressSet, Expression, SetOperator, MAX_DEPTH};
use crate::tokenizer::symbol::Delimiter;
use crate::tokenizer::token::Token;

/// Deepest run of open parentheses a command may contain.
pub const MAX_NESTING: usize = 128;

/// A parsed operand before it is folded into the AST. Bare address literals are
/// kept apart from everything else so a union made only of literals can collapse
/// into a single [`AddressSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// An address literal, or `None` for an empty operand position
    Literal(Option<Address>),
    Expr(Expression),
}

impl Operand {
    pub fn into_expression(self) -> Expression {
        match self {
            Operand::Literal(address) => Expression::AddressSet(address.into_iter().collect()),
            Operand::Expr(expr) => expr,
        }
    }

    fn is_literal(&self) -> bool {
        matches!(self, Operand::Literal(_))
    }

    fn depth(&self) -> usize {
        match self {
            Operand::Literal(_) => 0,
            Operand::Expr(expr) => expr.depth(),
        }
    }
}

/// Rejects token streams whose parentheses nest deeper than [`MAX_NESTING`].
pub fn check_nesting(tokens: &[Token]) -> Result<(), ParseError> {
    let mut depth = 0usize;
    for token in tokens {
        match token {
            Token::Delimiter(Delimiter::OpenParen) => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(ParseError::TooDeep { limit: MAX_NESTING });
                }
            }
            Token::Delimiter(Delimiter::CloseParen) => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

fn checked_depth(depth: usize) -> Result<usize, ParseError> {
    if depth > MAX_DEPTH {
        Err(ParseError::TooDeep { limit: MAX_DEPTH })
    } else {
        Ok(depth)
    }
}

fn fold_chain(op: SetOperator, first: Operand, rest: Vec<Operand>) -> Result<Operand, ParseError> {
    if rest.is_empty() {
        return Ok(first);
    }
    let mut depth = first.depth();
    let mut folded = first.into_expression();
    for right in rest {
        depth = checked_depth(1 + depth.max(right.depth()))?;
        folded = Expression::set_op(op, folded, right.into_expression());
    }
    Ok(Operand::Expr(folded))
}

fn fold_union(first: Operand, rest: Vec<Operand>) -> Result<Expression, ParseError> {
    if first.is_literal() && rest.iter().all(Operand::is_literal) {
        let addresses: AddressSet = std::iter::once(first)
            .chain(rest)
            .filter_map(|operand| match operand {
                Operand::Literal(address) => address,
                Operand::Expr(_) => None,
            })
            .collect();
        return Ok(Expression::AddressSet(addresses));
    }
    fold_chain(SetOperator::Union, first, rest).map(Operand::into_expression)
}

/// Folds `;`-separated statements into a left-leaning [`Expression::Sequence`].
pub fn fold_sequence(statements: Vec<Expression>) -> Result<Expression, ParseError> {
    let mut statements = statements.into_iter();
    let Some(first) = statements.next() else {
        return Ok(Expression::empty());
    };
    let mut depth = first.depth();
    let mut folded = first;
    for second in statements {
        depth = checked_depth(1 + depth.max(second.depth()))?;
        folded = Expression::sequence(folded, second);
    }
    Ok(folded)
}

/// The `;`-separated statements of a sequence, unfolded.
pub fn parse_statements() -> impl Parser<Token, Vec<Expression>> {
    with_context(
        map(
            tuple2(
                parse_definition(),
                many(preceded(as_unit(parse_semicolon()), parse_definition())),
            ),
            |(first, rest): (Expression, Vec<Expression>)| {
                std::iter::once(first).chain(rest).collect()
            },
        ),
        "sequence",
    )
}

pub fn parse_sequence() -> impl Parser<Token, Expression> {
    try_map(parse_statements(), fold_sequence)
}

pub fn parse_definition() -> impl Parser<Token, Expression> {
    with_context(
        try_map(
            tuple2(
                optional(tuple2(parse_identifier(), as_unit(parse_equal()))),
                parse_union(),
            ),
            |(binding, value): (Option<(String, ())>, Expression)| match binding {
                Some((name, _)) => {
                    checked_depth(1 + value.depth())?;
                    Ok(Expression::definition(name, value))
                }
                None => Ok(value),
            },
        ),
        "definition",
    )
}

pub fn parse_union() -> impl Parser<Token, Expression> {
    with_context(
        try_map(
            tuple2(
                parse_difference(),
                many(preceded(
                    as_unit(parse_union_operator()),
                    parse_difference(),
                )),
            ),
            |(first, rest): (Operand, Vec<Operand>)| fold_union(first, rest),
        ),
        "union",
    )
}

pub fn parse_difference() -> impl Parser<Token, Operand> {
    with_context(
        try_map(
            tuple2(
                parse_intersection(),
                many(preceded(
                    as_unit(parse_difference_operator()),
                    parse_intersection(),
                )),
            ),
            |(first, rest): (Operand, Vec<Operand>)| {
                fold_chain(SetOperator::Difference, first, rest)
            },
        ),
        "difference",
    )
}

pub fn parse_intersection() -> impl Parser<Token, Operand> {
    with_context(
        try_map(
            tuple2(
                parse_list(),
                many(preceded(
                    as_unit(parse_intersection_operator()),
                    parse_list(),
                )),
            ),
            |(first, rest): (Operand, Vec<Operand>)| {
                fold_chain(SetOperator::Intersection, first, rest)
            },
        ),
        "intersection",
    )
}

pub fn parse_list() -> impl Parser<Token, Operand> {
    with_context(
        choice(vec![
            Box::new(map(parse_address(), |address: Address| {
                Operand::Literal(Some(address))
            })),
            Box::new(map(parse_identifier(), |name: String| {
                Operand::Expr(Expression::NamedRef(name))
            })),
            Box::new(map(
                delimited(
                    as_unit(parse_open_paren()),
                    lazy(parse_sequence),
                    as_unit(parse_close_paren()),
                ),
                Operand::Expr,
            )),
            Box::new(zero(Operand::Literal(None))),
        ]),
        "list",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::symbol::Operator;

    fn address(raw: &str) -> Token {
        Token::Address(raw.to_string())
    }

    fn name(raw: &str) -> Token {
        Token::Identifier(raw.to_string())
    }

    fn set(raw: &[&str]) -> Expression {
        Expression::addresses(raw.iter().copied()).unwrap()
    }

    #[test]
    fn test_literal_union_collapses() {
        let tokens = vec![
            address("a@x"),
            Token::Operator(Operator::Union),
            address("B@Y"),
        ];
        let (pos, expr) = parse_sequence().parse(&tokens, 0).unwrap();
        assert_eq!(pos, 3);
        assert_eq!(expr, set(&["a@x", "b@y"]));
    }

    #[test]
    fn test_mixed_union_folds_left() {
        let tokens = vec![
            address("a@x"),
            Token::Operator(Operator::Union),
            name("staff"),
            Token::Operator(Operator::Union),
            address("b@x"),
        ];
        let (_, expr) = parse_sequence().parse(&tokens, 0).unwrap();
        assert_eq!(
            expr,
            Expression::union(
                Expression::union(set(&["a@x"]), Expression::named("staff")),
                set(&["b@x"])
            )
        );
    }

    #[test]
    fn test_precedence() {
        // a , b ! c * d  ==  a , (b ! (c * d))
        let tokens = vec![
            name("a"),
            Token::Operator(Operator::Union),
            name("b"),
            Token::Operator(Operator::Difference),
            name("c"),
            Token::Operator(Operator::Intersection),
            name("d"),
        ];
        let (_, expr) = parse_sequence().parse(&tokens, 0).unwrap();
        assert_eq!(
            expr,
            Expression::union(
                Expression::named("a"),
                Expression::difference(
                    Expression::named("b"),
                    Expression::intersection(Expression::named("c"), Expression::named("d"))
                )
            )
        );
    }

    #[test]
    fn test_definition_and_sequence() {
        let tokens = vec![
            name("x"),
            Token::Delimiter(Delimiter::Equal),
            address("a@x"),
            Token::Delimiter(Delimiter::Semicolon),
            name("x"),
        ];
        let (pos, expr) = parse_sequence().parse(&tokens, 0).unwrap();
        assert_eq!(pos, 5);
        assert_eq!(
            expr,
            Expression::sequence(
                Expression::definition("x", set(&["a@x"])),
                Expression::named("x")
            )
        );
    }

    #[test]
    fn test_group() {
        let tokens = vec![
            Token::Delimiter(Delimiter::OpenParen),
            name("a"),
            Token::Delimiter(Delimiter::Semicolon),
            name("b"),
            Token::Delimiter(Delimiter::CloseParen),
            Token::Operator(Operator::Intersection),
            name("c"),
        ];
        let (pos, expr) = parse_sequence().parse(&tokens, 0).unwrap();
        assert_eq!(pos, 7);
        assert_eq!(
            expr,
            Expression::intersection(
                Expression::sequence(Expression::named("a"), Expression::named("b")),
                Expression::named("c")
            )
        );
    }

    #[test]
    fn test_empty_operands() {
        let (pos, expr) = parse_sequence().parse(&[], 0).unwrap();
        assert_eq!(pos, 0);
        assert_eq!(expr, Expression::empty());

        let tokens = vec![
            address("a@x"),
            Token::Operator(Operator::Union),
            Token::Operator(Operator::Union),
        ];
        let (_, expr) = parse_sequence().parse(&tokens, 0).unwrap();
        assert_eq!(expr, set(&["a@x"]));
    }

    #[test]
    fn test_statements_stay_flat() {
        let tokens = vec![
            name("a"),
            Token::Delimiter(Delimiter::Semicolon),
            name("b"),
            Token::Delimiter(Delimiter::Semicolon),
            name("c"),
        ];
        let (pos, statements) = parse_statements().parse(&tokens, 0).unwrap();
        assert_eq!(pos, 5);
        assert_eq!(
            statements,
            vec![Expression::named("a"), Expression::named("b"), Expression::named("c")]
        );
    }

    #[test]
    fn test_long_chain_is_too_deep() {
        let mut tokens = vec![name("n")];
        for _ in 0..MAX_DEPTH + 1 {
            tokens.push(Token::Operator(Operator::Union));
            tokens.push(name("n"));
        }
        assert_eq!(
            parse_sequence().parse(&tokens, 0).unwrap_err().root_cause(),
            &ParseError::TooDeep { limit: MAX_DEPTH }
        );

        tokens.truncate(2 * MAX_DEPTH + 1);
        let (_, expr) = parse_sequence().parse(&tokens, 0).unwrap();
        assert_eq!(expr.depth(), MAX_DEPTH);
    }

    #[test]
    fn test_literal_chain_has_no_depth() {
        let mut tokens = vec![address("a0@x")];
        for i in 1..2 * MAX_DEPTH {
            tokens.push(Token::Operator(Operator::Union));
            tokens.push(address(&format!("a{}@x", i)));
        }
        let (_, expr) = parse_sequence().parse(&tokens, 0).unwrap();
        assert_eq!(expr.depth(), 0);
    }

    #[test]
    fn test_check_nesting() {
        let open = Token::Delimiter(Delimiter::OpenParen);
        let close = Token::Delimiter(Delimiter::CloseParen);

        let mut tokens = vec![open.clone(); MAX_NESTING];
        tokens.extend(vec![close.clone(); MAX_NESTING]);
        assert_eq!(check_nesting(&tokens), Ok(()));

        tokens.insert(0, open);
        assert_eq!(
            check_nesting(&tokens),
            Err(ParseError::TooDeep { limit: MAX_NESTING })
        );

        // sibling groups do not add up
        let siblings: Vec<Token> = (0..MAX_NESTING * 2)
            .flat_map(|_| [Token::Delimiter(Delimiter::OpenParen), close.clone()])
            .collect();
        assert_eq!(check_nesting(&siblings), Ok(()));
    }

    #[test]
    fn test_unclosed_group_stops_early() {
        let tokens = vec![Token::Delimiter(Delimiter::OpenParen), name("a")];
        let (pos, _) = parse_sequence().parse(&tokens, 0).unwrap();
        assert_eq!(pos, 0);
    }
}
