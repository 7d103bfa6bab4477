//! Filter expression tree
//!
//! A compiled filter is a tree of [`Expression`] nodes: literals, field and
//! path accessors, boolean connectives, comparisons and the built-in
//! membership/containment predicates. Nodes own their children and are
//! immutable after construction, so one compiled tree can be shared across
//! concurrent executions; per-execution planning state lives in
//! [`crate::planner`], never on the node.

mod context;
mod eval;
mod simplify;

pub use context::EvalContext;
pub use simplify::simplify;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// One node of a filter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Constant value
    Literal(Value),
    /// Field read on the current candidate
    Field(String),
    /// Chained accessor: evaluate left, then right against its result
    Path(Box<Expression>, Box<Expression>),
    /// Literal list of expressions (the right side of `IN [..]`)
    Collection(Vec<Expression>),
    /// Conjunction over all children
    And(Vec<Expression>),
    /// Disjunction over all children
    Or(Vec<Expression>),
    /// Value equality (cross-type rules)
    Equals(Box<Expression>, Box<Expression>),
    /// Negated equality
    NotEquals(Box<Expression>, Box<Expression>),
    /// Strict less-than
    Inferior(Box<Expression>, Box<Expression>),
    /// Less-than-or-equal
    InferiorEquals(Box<Expression>, Box<Expression>),
    /// Strict greater-than
    Superior(Box<Expression>, Box<Expression>),
    /// Greater-than-or-equal
    SuperiorEquals(Box<Expression>, Box<Expression>),
    /// `target BETWEEN min AND max`, both edges inclusive
    Between(Box<Expression>, Box<Expression>, Box<Expression>),
    /// Membership against a collection
    In(Box<Expression>, Box<Expression>),
    /// Collection containment (element equality or nested predicate)
    Contains(Box<Expression>, Box<Expression>),
    /// Substring containment on text
    ContainsText {
        left: Box<Expression>,
        right: Box<Expression>,
        ignore_case: bool,
    },
    /// Map value containment (value equality or nested predicate)
    ContainsValue(Box<Expression>, Box<Expression>),
    /// Overloaded accessor/filter: 2 operands (source, filter) or
    /// 3 operands (source, from, to) for an inclusive slice
    Filtered(Vec<Expression>),
    /// Constant predicate: every candidate matches
    Include,
    /// Constant predicate: no candidate matches
    Exclude,
}

impl Expression {
    /// Literal from any value-convertible
    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(value.into())
    }

    /// Field reference
    pub fn field(name: impl Into<String>) -> Self {
        Expression::Field(name.into())
    }

    /// Chained accessor `left.right`
    pub fn path(left: Expression, right: Expression) -> Self {
        Expression::Path(Box::new(left), Box::new(right))
    }

    pub fn and(children: impl IntoIterator<Item = Expression>) -> Self {
        Expression::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Or(children.into_iter().collect())
    }

    pub fn equals(left: Expression, right: Expression) -> Self {
        Expression::Equals(Box::new(left), Box::new(right))
    }

    pub fn not_equals(left: Expression, right: Expression) -> Self {
        Expression::NotEquals(Box::new(left), Box::new(right))
    }

    pub fn inferior(left: Expression, right: Expression) -> Self {
        Expression::Inferior(Box::new(left), Box::new(right))
    }

    pub fn inferior_equals(left: Expression, right: Expression) -> Self {
        Expression::InferiorEquals(Box::new(left), Box::new(right))
    }

    pub fn superior(left: Expression, right: Expression) -> Self {
        Expression::Superior(Box::new(left), Box::new(right))
    }

    pub fn superior_equals(left: Expression, right: Expression) -> Self {
        Expression::SuperiorEquals(Box::new(left), Box::new(right))
    }

    pub fn between(target: Expression, min: Expression, max: Expression) -> Self {
        Expression::Between(Box::new(target), Box::new(min), Box::new(max))
    }

    pub fn in_(left: Expression, right: Expression) -> Self {
        Expression::In(Box::new(left), Box::new(right))
    }

    pub fn contains(left: Expression, right: Expression) -> Self {
        Expression::Contains(Box::new(left), Box::new(right))
    }

    pub fn contains_text(left: Expression, right: Expression, ignore_case: bool) -> Self {
        Expression::ContainsText {
            left: Box::new(left),
            right: Box::new(right),
            ignore_case,
        }
    }

    pub fn contains_value(left: Expression, right: Expression) -> Self {
        Expression::ContainsValue(Box::new(left), Box::new(right))
    }

    /// Accessor/filter over a source expression
    pub fn filtered(source: Expression, filter: Expression) -> Self {
        Expression::Filtered(vec![source, filter])
    }

    /// Inclusive slice `source[from..to]`
    pub fn slice(source: Expression, from: Expression, to: Expression) -> Self {
        Expression::Filtered(vec![source, from, to])
    }

    /// True when the subtree references neither candidate fields nor
    /// context variables, so it evaluates to the same value everywhere.
    pub fn is_static(&self) -> bool {
        match self {
            Expression::Literal(_) | Expression::Include | Expression::Exclude => true,
            Expression::Collection(children)
            | Expression::And(children)
            | Expression::Or(children) => children.iter().all(Expression::is_static),
            Expression::Equals(l, r)
            | Expression::NotEquals(l, r)
            | Expression::Inferior(l, r)
            | Expression::InferiorEquals(l, r)
            | Expression::Superior(l, r)
            | Expression::SuperiorEquals(l, r)
            | Expression::In(l, r)
            | Expression::Contains(l, r)
            | Expression::ContainsValue(l, r) => l.is_static() && r.is_static(),
            Expression::ContainsText { left, right, .. } => {
                left.is_static() && right.is_static()
            }
            Expression::Between(t, min, max) => {
                t.is_static() && min.is_static() && max.is_static()
            }
            Expression::Field(_)
            | Expression::Path(_, _)
            | Expression::Filtered(_) => false,
        }
    }

    /// Evaluates a static subtree once, outside any candidate.
    pub(crate) fn static_value(&self) -> Value {
        self.evaluate(&EvalContext::new(), &Value::Null)
    }
}
