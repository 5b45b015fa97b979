//! # Core Parser Definitions
//!
//! The parser interface and error type shared by every combinator.

use thiserror::Error;

/// All parsers take an input slice and a position, and return the new position with
/// the parsed value.
pub trait Parser<I, O> {
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O>;
}

pub type ParseResult<O> = Result<(usize, O), ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected EOF")]
    EOF,
    #[error("Unexpected {found} at token {position}, expected {expected}")]
    Unexpected {
        expected: String,
        found: String,
        position: usize,
    },
    #[error("No alternative")]
    NoAlternative,
    #[error("Fail: {0}")]
    Fail(String),
    #[error("Unconsumed input at token {position}: {found}")]
    TrailingInput { found: String, position: usize },
    #[error("Expression nests deeper than {limit} levels")]
    TooDeep { limit: usize },
    #[error("{message}: {inner}")]
    WithContext {
        message: String,
        inner: Box<ParseError>,
    },
}

impl ParseError {
    /// The innermost error, with every context layer peeled off.
    pub fn root_cause(&self) -> &ParseError {
        match self {
            ParseError::WithContext { inner, .. } => inner.root_cause(),
            other => other,
        }
    }
}
