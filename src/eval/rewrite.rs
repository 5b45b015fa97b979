//! Pure tree rewrites. None of these touch the environment beyond reading it.

use crate::ast::Expression;

use super::bindings::Bindings;

/// Strips command semantics so the tree can be stored. A definition reduces to its
/// value and a sequence to its second statement; nothing is executed.
pub fn simplify(expr: &Expression) -> Expression {
    match expr {
        Expression::AddressSet(_) | Expression::NamedRef(_) => expr.clone(),
        Expression::SetOp { op, left, right } => {
            Expression::set_op(*op, simplify(left), simplify(right))
        }
        Expression::Definition { value, .. } => simplify(value),
        Expression::Sequence { second, .. } => simplify(second),
    }
}

/// Replaces every reference to `target` with its current binding, or with the
/// empty set when `target` is unbound.
pub fn substitute_name(expr: &Expression, target: &str, bindings: &Bindings) -> Expression {
    match expr {
        Expression::NamedRef(name) if name == target => bindings
            .get(target)
            .cloned()
            .unwrap_or_else(Expression::empty),
        Expression::AddressSet(_) | Expression::NamedRef(_) => expr.clone(),
        Expression::SetOp { op, left, right } => Expression::set_op(
            *op,
            substitute_name(left, target, bindings),
            substitute_name(right, target, bindings),
        ),
        Expression::Definition { name, value } => {
            Expression::definition(name.clone(), substitute_name(value, target, bindings))
        }
        Expression::Sequence { first, second } => Expression::sequence(
            substitute_name(first, target, bindings),
            substitute_name(second, target, bindings),
        ),
    }
}

/// True iff `name` occurs as a reference anywhere in `expr`.
pub fn depends_on(expr: &Expression, name: &str) -> bool {
    match expr {
        Expression::AddressSet(_) => false,
        Expression::NamedRef(referenced) => referenced == name,
        Expression::SetOp { left, right, .. } => depends_on(left, name) || depends_on(right, name),
        Expression::Definition { value, .. } => depends_on(value, name),
        Expression::Sequence { first, second } => {
            depends_on(first, name) || depends_on(second, name)
        }
    }
}
