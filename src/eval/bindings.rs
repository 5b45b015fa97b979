use std::collections::HashMap;

use tracing::debug;

use crate::ast::{Expression, MAX_DEPTH};

use super::evaluator::{EvalError, EvalResult};
use super::rewrite::{depends_on, substitute_name};

/// Name table holding simplified list expressions.
///
/// Invariant: after every successful [`assign`](Bindings::assign) no two names
/// reference each other.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    lists: HashMap<String, Expression>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`.
    ///
    /// References to `name` inside `value` are first replaced by its current
    /// binding, so `x = x, a@b` extends `x`. The cycle check is one hop: it rejects
    /// the assignment when some bound name already refers to `name` and the new
    /// value refers back to that name. Values deeper than [`MAX_DEPTH`] after
    /// substitution are refused as well. The table is untouched on failure.
    pub fn assign(&mut self, name: &str, value: Expression) -> EvalResult<()> {
        let substituted = substitute_name(&value, name, self);

        if substituted.depth() > MAX_DEPTH {
            debug!("rejecting {}: value nests deeper than {}", name, MAX_DEPTH);
            return Err(EvalError::TooDeep { limit: MAX_DEPTH });
        }

        if let Some(dependent) = self
            .lists
            .iter()
            .find(|(key, bound)| depends_on(bound, name) && depends_on(&substituted, key))
            .map(|(key, _)| key.clone())
        {
            debug!("rejecting {} = {}: cycle through {}", name, substituted, dependent);
            return Err(EvalError::Cycle {
                name: name.to_string(),
                dependent,
            });
        }

        self.lists.insert(name.to_string(), substituted);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lists.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Expression> {
        self.lists.get(name)
    }

    pub fn clear(&mut self) {
        self.lists.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Expression)> {
        self.lists.iter()
    }

    /// Bound names in ascending order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lists.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}
