//! # List Expression AST
//!
//! The AST is a closed sum type: [`Expression`] covers address-set literals, named
//! references, the three set operators, and the two command forms (definition and
//! sequence). Equality is structural: `(a!b)!c` and `a!(b!c)` are different trees
//! even when they evaluate to the same set.
//!
//! [`fmt::Display`] on [`Expression`] is the rendered-value grammar. It is the inverse
//! of [`parse`](crate::parser::parse): for every tree the grammar can produce,
//! `parse(&expr.to_string())` yields `expr` again.

use core::fmt;
use std::collections::BTreeSet;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

lazy_static! {
    static ref ADDRESS_PATTERN: Regex =
        Regex::new(r"^[a-z0-9._+\-]+@[a-z0-9._\-]+$").expect("address pattern is valid");
}

/// Deepest tree the parser builds and the bindings store. Every pass over an
/// [`Expression`] recurses, so this bound is what keeps them on the stack.
pub const MAX_DEPTH: usize = 512;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AstError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

pub type AstResult<T> = Result<T, AstError>;

/// A normalized (lowercase) `local@domain` address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(String);

impl Address {
    pub fn new(raw: &str) -> AstResult<Self> {
        let normalized = raw.trim().to_lowercase();
        if ADDRESS_PATTERN.is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(AstError::InvalidAddress(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = AstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A concrete, already-evaluated set of recipients.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressSet {
    addresses: BTreeSet<Address>,
}

impl AddressSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from raw address strings. Blank entries are dropped, the rest are
    /// lowercased and validated.
    pub fn from_raw<I, S>(raw: I) -> AstResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let addresses = raw
            .into_iter()
            .filter(|s| !s.as_ref().trim().is_empty())
            .map(|s| Address::new(s.as_ref()))
            .collect::<AstResult<BTreeSet<_>>>()?;
        Ok(Self { addresses })
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn contains(&self, address: &str) -> bool {
        Address::new(address)
            .map(|a| self.addresses.contains(&a))
            .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.addresses.iter()
    }

    pub fn union(&self, other: &AddressSet) -> AddressSet {
        self.addresses.union(&other.addresses).cloned().collect()
    }

    pub fn intersection(&self, other: &AddressSet) -> AddressSet {
        self.addresses
            .intersection(&other.addresses)
            .cloned()
            .collect()
    }

    pub fn difference(&self, other: &AddressSet) -> AddressSet {
        self.addresses.difference(&other.addresses).cloned().collect()
    }
}

impl FromIterator<Address> for AddressSet {
    fn from_iter<T: IntoIterator<Item = Address>>(iter: T) -> Self {
        Self {
            addresses: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for AddressSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let joined = self
            .addresses
            .iter()
            .map(Address::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "({})", joined)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr)]
pub enum SetOperator {
    #[strum(serialize = ",")]
    Union,
    #[strum(serialize = "!")]
    Difference,
    #[strum(serialize = "*")]
    Intersection,
}

impl SetOperator {
    pub fn apply(&self, left: &AddressSet, right: &AddressSet) -> AddressSet {
        match self {
            SetOperator::Union => left.union(right),
            SetOperator::Difference => left.difference(right),
            SetOperator::Intersection => left.intersection(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    AddressSet(AddressSet),
    NamedRef(String),
    SetOp {
        op: SetOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    // command forms
    Definition {
        name: String,
        value: Box<Expression>,
    },
    Sequence {
        first: Box<Expression>,
        second: Box<Expression>,
    },
}

impl Expression {
    pub fn empty() -> Self {
        Expression::AddressSet(AddressSet::new())
    }

    pub fn addresses<I, S>(raw: I) -> AstResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        AddressSet::from_raw(raw).map(Expression::AddressSet)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Expression::NamedRef(name.into())
    }

    pub fn set_op(op: SetOperator, left: Expression, right: Expression) -> Self {
        Expression::SetOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn union(left: Expression, right: Expression) -> Self {
        Self::set_op(SetOperator::Union, left, right)
    }

    pub fn difference(left: Expression, right: Expression) -> Self {
        Self::set_op(SetOperator::Difference, left, right)
    }

    pub fn intersection(left: Expression, right: Expression) -> Self {
        Self::set_op(SetOperator::Intersection, left, right)
    }

    pub fn definition(name: impl Into<String>, value: Expression) -> Self {
        Expression::Definition {
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn sequence(first: Expression, second: Expression) -> Self {
        Expression::Sequence {
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    /// True for trees without definitions or sequences, i.e. trees fit for storage.
    pub fn is_simple(&self) -> bool {
        match self {
            Expression::AddressSet(_) | Expression::NamedRef(_) => true,
            Expression::SetOp { left, right, .. } => left.is_simple() && right.is_simple(),
            Expression::Definition { .. } | Expression::Sequence { .. } => false,
        }
    }

    /// Length of the longest path from this node to a leaf; leaves are 0.
    pub fn depth(&self) -> usize {
        match self {
            Expression::AddressSet(_) | Expression::NamedRef(_) => 0,
            Expression::SetOp { left, right, .. } => 1 + left.depth().max(right.depth()),
            Expression::Definition { value, .. } => 1 + value.depth(),
            Expression::Sequence { first, second } => 1 + first.depth().max(second.depth()),
        }
    }

    // A left-nested run of one operator folds back the same way, so it renders as
    // a flat chain.
    fn fmt_chain(&self, chain_op: SetOperator, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::SetOp { op, left, right } if *op == chain_op => {
                left.fmt_chain(chain_op, f)?;
                write!(f, "{}", op)?;
                right.fmt_operand(f)
            }
            _ => self.fmt_operand(f),
        }
    }

    // A sequence nested anywhere but the left of another sequence needs its own
    // parentheses, otherwise `;` would re-associate on the way back in.
    fn fmt_operand(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::Sequence { .. } => write!(f, "({})", self),
            _ => write!(f, "{}", self),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::AddressSet(set) => write!(f, "{}", set),
            Expression::NamedRef(name) => write!(f, "{}", name),
            Expression::SetOp { op, .. } => {
                write!(f, "(")?;
                self.fmt_chain(*op, f)?;
                write!(f, ")")
            }
            Expression::Definition { name, value } => {
                write!(f, "({}=", name)?;
                value.fmt_operand(f)?;
                write!(f, ")")
            }
            Expression::Sequence { first, second } => {
                write!(f, "{};", first)?;
                second.fmt_operand(f)
            }
        }
    }
}
