//! # Preprocessor
//!
//! Sits between the tokenizer and the analyzer:
//!
//! ```text
//! Command text → Tokenizer → Preprocessor → Analyzer → AST
//! ```
//!
//! The list language has no comments, so the only normalization is dropping the
//! formatting tokens (whitespace and newlines) the tokenizer keeps for positioning.

use crate::tokenizer::token::{Token, TokenSpan};

/// A trait for preprocessing different types of input
pub trait Preprocessor<T, U = T> {
    /// Process the input of type T and return the processed result
    fn process(&self, input: T) -> U;
}

/// Token-specific preprocessor implementation
#[derive(Debug, Default)]
pub struct TokenPreprocessor {}

impl TokenPreprocessor {
    pub fn new() -> Self {
        Self {}
    }
}

impl Preprocessor<Vec<TokenSpan>> for TokenPreprocessor {
    fn process(&self, input: Vec<TokenSpan>) -> Vec<TokenSpan> {
        input
            .into_iter()
            .filter(|span| !span.token.is_formatting())
            .collect()
    }
}

impl Preprocessor<Vec<TokenSpan>, Vec<Token>> for TokenPreprocessor {
    fn process(&self, input: Vec<TokenSpan>) -> Vec<Token> {
        input
            .into_iter()
            .map(|span| span.token)
            .filter(|token| !token.is_formatting())
            .collect()
    }
}
