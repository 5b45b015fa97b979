//! Text to [`Expression`] pipeline.
//!
//! ```text
//! Command text → Tokenizer → Preprocessor → Analyzer → Expression
//! ```

use tracing::debug;

use crate::analyzer::{
    parsers::{check_nesting, fold_sequence, parse_statements as statements},
    ParseError, Parser,
};
use crate::ast::Expression;
use crate::error::InternalResult;
use crate::preprocessor::{Preprocessor, TokenPreprocessor};
use crate::tokenizer::token::{Token, Tokenizer};

/// Parses one command (or a `;`-separated series of them) into an AST.
///
/// # Examples
///
/// ```
/// use norn::ast::Expression;
///
/// let expr = norn::parser::parse("a@x, B@Y").unwrap();
/// assert_eq!(expr, Expression::addresses(["a@x", "b@y"]).unwrap());
/// assert!(norn::parser::parse("a@x)").is_err());
/// ```
pub fn parse(text: &str) -> InternalResult<Expression> {
    Ok(fold_sequence(parse_statements(text)?)?)
}

/// Parses a `;`-separated series of commands without folding them into one
/// [`Expression::Sequence`], so a long series costs no tree depth.
#[tracing::instrument(level = "debug", skip(text), fields(len = text.len()))]
pub fn parse_statements(text: &str) -> InternalResult<Vec<Expression>> {
    let spans = Tokenizer::new().tokenize(text)?;
    let tokens: Vec<Token> = TokenPreprocessor::new().process(spans);
    check_nesting(&tokens)?;

    let (pos, parsed) = statements().parse(&tokens, 0)?;
    if let Some(token) = tokens.get(pos) {
        let error = ParseError::TrailingInput {
            found: token.to_string(),
            position: pos,
        };
        debug!("{}", error);
        return Err(error.into());
    }
    Ok(parsed)
}
