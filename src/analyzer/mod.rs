//! # Analyzer
//!
//! A small token-level parser-combinator framework and the list grammar built on
//! it. The analyzer consumes the preprocessed `Token` stream and produces an
//! [`ast::Expression`](crate::ast::Expression).

pub mod combinators;
pub mod core;
pub mod parsers;
pub mod prelude;

pub use self::core::ParseError;
pub use self::core::ParseResult;
pub use self::core::Parser;
