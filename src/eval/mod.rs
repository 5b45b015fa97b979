//! # Evaluation
//!
//! * [`Evaluator`] reduces an [`Expression`](crate::ast::Expression) to an
//!   [`AddressSet`](crate::ast::AddressSet), binding names as a side effect of
//!   definitions.
//! * [`rewrite`] holds the pure tree passes: `simplify`, `substitute_name` and
//!   `depends_on`.
//! * [`Bindings`] is the name table with the cycle check. It does no locking of its
//!   own; [`Environment`](crate::environment::Environment) owns the lock.

pub mod bindings;
pub mod evaluator;
pub mod rewrite;

pub use bindings::Bindings;
pub use evaluator::{EvalError, EvalResult, Evaluator, MAX_EVAL_DEPTH};
