use thiserror::Error;
use tracing::debug;

use crate::ast::{AddressSet, Expression, MAX_DEPTH};

use super::bindings::Bindings;
use super::rewrite::simplify;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Cycle: {name} and {dependent} would refer to each other")]
    Cycle { name: String, dependent: String },
    #[error("Expression nests deeper than {limit} levels")]
    TooDeep { limit: usize },
}

/// Deepest the evaluator recurses, counting both tree levels and the names
/// expanded along the way.
pub const MAX_EVAL_DEPTH: usize = 2 * MAX_DEPTH;

pub type EvalResult<T> = Result<T, EvalError>;

/// Reduces expressions to address sets against a [`Bindings`] table.
///
/// Definitions bind their name as a side effect, so evaluation needs the table
/// mutably. The caller is responsible for holding whatever lock guards it.
#[derive(Debug, Default)]
pub struct Evaluator {
    // names currently being expanded, innermost last
    resolving: Vec<String>,
    depth: usize,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(
        &mut self,
        expr: &Expression,
        bindings: &mut Bindings,
    ) -> EvalResult<AddressSet> {
        if self.depth >= MAX_EVAL_DEPTH {
            debug!("evaluation deeper than {}", MAX_EVAL_DEPTH);
            return Err(EvalError::TooDeep {
                limit: MAX_EVAL_DEPTH,
            });
        }
        self.depth += 1;
        let result = self.evaluate_node(expr, bindings);
        self.depth -= 1;
        result
    }

    fn evaluate_node(
        &mut self,
        expr: &Expression,
        bindings: &mut Bindings,
    ) -> EvalResult<AddressSet> {
        match expr {
            Expression::AddressSet(set) => Ok(set.clone()),
            Expression::NamedRef(name) => self.resolve(name, bindings),
            Expression::SetOp { op, left, right } => {
                let left = self.evaluate(left, bindings)?;
                let right = self.evaluate(right, bindings)?;
                Ok(op.apply(&left, &right))
            }
            Expression::Definition { name, value } => {
                bindings.assign(name, simplify(value))?;
                self.evaluate(value, bindings)
            }
            Expression::Sequence { first, second } => {
                self.evaluate(first, bindings)?;
                self.evaluate(second, bindings)
            }
        }
    }

    /// Unbound names are the empty set. A name met again while it is still being
    /// expanded means the bindings hold a cycle longer than the assignment check
    /// can see; that is reported instead of recursing forever.
    fn resolve(&mut self, name: &str, bindings: &mut Bindings) -> EvalResult<AddressSet> {
        let Some(bound) = bindings.get(name).cloned() else {
            return Ok(AddressSet::new());
        };

        if self.resolving.iter().any(|n| n == name) {
            let dependent = self.resolving.last().cloned().unwrap_or_default();
            debug!("cycle while resolving {} from {}", name, dependent);
            return Err(EvalError::Cycle {
                name: name.to_string(),
                dependent,
            });
        }

        self.resolving.push(name.to_string());
        let result = self.evaluate(&bound, bindings);
        self.resolving.pop();
        result
    }
}
