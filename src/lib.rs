//! # Norn
//!
//! A small language for composing mailing lists out of e-mail addresses with set
//! union (`,`), difference (`!`) and intersection (`*`), plus named definitions
//! (`name = ...`) shared by every client of a running server.
//!
//! ```text
//! Command text → Tokenizer → Preprocessor → Analyzer → AST → Evaluator
//! ```
//!
//! ```
//! use norn::environment::Environment;
//!
//! let env = Environment::new();
//! assert_eq!(env.execute("ab = A@a.com, b@b.com; ab!a@a.com").unwrap(), "b@b.com");
//! ```

pub mod analyzer;
pub mod ast;
pub mod config;
pub mod environment;
pub mod error;
pub mod eval;
pub mod parser;
pub mod persistence;
pub mod preprocessor;
pub mod server;
pub mod tokenizer;

// Re-exports
pub use ast::*;
pub use environment::Environment;
pub use error::*;
pub use parser::*;
