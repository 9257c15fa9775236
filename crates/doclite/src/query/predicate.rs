use crate::value::Value;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::ops::{BitAnd, BitOr};

///
/// Predicate AST
///
/// Pure, schema-agnostic representation of query predicates. This layer
/// carries no column resolution or coercion; all interpretation happens in
/// compilation. Leaves and groups are explicit variants, compiled by
/// structural matching.
///

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    In,
    NotIn,
    Is,
    IsNot,
}

impl CompareOp {
    /// The SQL token for this operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Like => "LIKE",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
        }
    }

    #[must_use]
    pub const fn is_list_op(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

///
/// Comparison
///
/// A predicate leaf: `(field, operator, operand)`. `In`/`NotIn` carry their
/// operand sequence as `Value::List`.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Comparison {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

impl Comparison {
    #[must_use]
    pub fn new(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}

///
/// Combinator
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum Combinator {
    #[display("AND")]
    And,

    #[display("OR")]
    Or,
}

///
/// Group
///
/// An alternating sequence `child (combinator child)*`, applied strictly
/// left-to-right with no implicit precedence. The shape makes the odd-length
/// alternation structurally impossible to violate. Callers nest groups when
/// they need different precedence.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Group {
    pub first: Box<Predicate>,
    pub rest: Vec<(Combinator, Predicate)>,
}

///
/// Predicate
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Predicate {
    Compare(Comparison),
    Group(Group),
}

impl Predicate {
    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Compare(Comparison::new(field, CompareOp::Eq, value))
    }

    #[must_use]
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Compare(Comparison::new(field, CompareOp::Ne, value))
    }

    #[must_use]
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Compare(Comparison::new(field, CompareOp::Lt, value))
    }

    #[must_use]
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Compare(Comparison::new(field, CompareOp::Lte, value))
    }

    #[must_use]
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Compare(Comparison::new(field, CompareOp::Gt, value))
    }

    #[must_use]
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Compare(Comparison::new(field, CompareOp::Gte, value))
    }

    #[must_use]
    pub fn like(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Compare(Comparison::new(field, CompareOp::Like, value))
    }

    #[must_use]
    pub fn in_(field: impl Into<String>, values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        let values = values.into_iter().map(Into::into).collect();

        Self::Compare(Comparison::new(field, CompareOp::In, Value::List(values)))
    }

    #[must_use]
    pub fn not_in(
        field: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<Value>>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();

        Self::Compare(Comparison::new(field, CompareOp::NotIn, Value::List(values)))
    }

    #[must_use]
    pub fn is(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Compare(Comparison::new(field, CompareOp::Is, value))
    }

    #[must_use]
    pub fn is_not(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Compare(Comparison::new(field, CompareOp::IsNot, value))
    }

    #[must_use]
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::is(field, Value::Null)
    }

    #[must_use]
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::is_not(field, Value::Null)
    }

    /// Append `other` to this predicate's flat sequence with `AND`.
    ///
    /// Appending keeps the receiver's sequence flat (left-to-right); passing
    /// an already-built group as `other` nests it as a single child.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        self.join(Combinator::And, other)
    }

    /// Append `other` to this predicate's flat sequence with `OR`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        self.join(Combinator::Or, other)
    }

    fn join(self, combinator: Combinator, other: Self) -> Self {
        match self {
            Self::Group(mut group) => {
                group.rest.push((combinator, other));
                Self::Group(group)
            }
            leaf => Self::Group(Group {
                first: Box::new(leaf),
                rest: vec![(combinator, other)],
            }),
        }
    }
}

impl BitAnd for Predicate {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl BitOr for Predicate {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}
