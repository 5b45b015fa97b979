pub mod common;
pub use common::*;

pub mod expression;
pub use expression::{
    check_nesting, fold_sequence, parse_sequence, parse_statements, Operand, MAX_NESTING,
};
