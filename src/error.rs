use thiserror::Error;

use crate::analyzer::ParseError;
use crate::ast::AstError;
use crate::eval::EvalError;
use crate::persistence::PersistenceError;
use crate::tokenizer::token::TokenizerError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("AST error: {0}")]
    Ast(#[from] AstError),
    #[error("Eval error: {0}")]
    Eval(#[from] EvalError),
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InternalResult<T> = Result<T, Error>;

impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }

    /// Malformed command text, whichever stage rejected it.
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            Error::Tokenizer(_) | Error::Parse(_) | Error::Ast(_)
        )
    }

    pub fn is_cycle(&self) -> bool {
        matches!(self, Error::Eval(EvalError::Cycle { .. }))
    }
}
