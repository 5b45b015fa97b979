//! # Tokenizer Component
//!
//! The Tokenizer is the first stage of the list-expression pipeline. It turns a raw
//! command line into a stream of [`TokenSpan`](token::TokenSpan)s for the analyzer.
//!
//! ## Design Principles
//!
//! * **Position Information**: Every token carries its byte range, line and column so
//!   that parse errors can point at the offending input.
//! * **Format Preservation**: Whitespace and newlines are kept as tokens; the
//!   [`preprocessor`](crate::preprocessor) strips them before parsing.
//! * **Strict Lexemes**: Address literals are validated while they are scanned, so a
//!   malformed address (`a@`, `a@a@a.com`) never reaches the analyzer.
//!
//! ## Component Structure
//!
//! * [`token`]: Core token types and the tokenizer driver
//! * [`address`]: Address literal and list name scanning
//! * [`symbol`]: Set operators and delimiters
//! * [`whitespace`]: Whitespace and newline handling
//!
//! ## Usage Example
//!
//! ```rust
//! use norn::tokenizer::token::{Token, Tokenizer};
//!
//! let mut tokenizer = Tokenizer::new();
//! let tokens = tokenizer.tokenize("staff = a@mit.edu, b@mit.edu").unwrap();
//! assert_eq!(tokens[0].token, Token::Identifier("staff".to_string()));
//! ```

pub mod address;
pub mod symbol;
pub mod token;
pub mod whitespace;
