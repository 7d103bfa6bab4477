//! Expression simplification
//!
//! A recursive rewrite run once after parsing: flattens nested And/Or
//! chains, propagates the constant `Include`/`Exclude` predicates and
//! unwraps single-child connectives. The planner does not depend on it;
//! simplification only shrinks the tree it is handed.

use super::Expression;

/// Returns a simplified copy of the expression.
pub fn simplify(expr: &Expression) -> Expression {
    match expr {
        Expression::And(children) => simplify_and(children),
        Expression::Or(children) => simplify_or(children),

        Expression::Equals(l, r) => Expression::equals(simplify(l), simplify(r)),
        Expression::NotEquals(l, r) => Expression::not_equals(simplify(l), simplify(r)),
        Expression::Inferior(l, r) => Expression::inferior(simplify(l), simplify(r)),
        Expression::InferiorEquals(l, r) => {
            Expression::inferior_equals(simplify(l), simplify(r))
        }
        Expression::Superior(l, r) => Expression::superior(simplify(l), simplify(r)),
        Expression::SuperiorEquals(l, r) => {
            Expression::superior_equals(simplify(l), simplify(r))
        }
        Expression::Between(t, min, max) => {
            Expression::between(simplify(t), simplify(min), simplify(max))
        }
        Expression::In(l, r) => Expression::in_(simplify(l), simplify(r)),
        Expression::Contains(l, r) => Expression::contains(simplify(l), simplify(r)),
        Expression::ContainsText {
            left,
            right,
            ignore_case,
        } => Expression::contains_text(simplify(left), simplify(right), *ignore_case),
        Expression::ContainsValue(l, r) => {
            Expression::contains_value(simplify(l), simplify(r))
        }
        Expression::Path(l, r) => Expression::path(simplify(l), simplify(r)),
        Expression::Collection(children) => {
            Expression::Collection(children.iter().map(simplify).collect())
        }
        Expression::Filtered(children) => {
            Expression::Filtered(children.iter().map(simplify).collect())
        }

        Expression::Literal(_)
        | Expression::Field(_)
        | Expression::Include
        | Expression::Exclude => expr.clone(),
    }
}

fn simplify_and(children: &[Expression]) -> Expression {
    let mut flattened = Vec::with_capacity(children.len());
    for child in children {
        match simplify(child) {
            // One impossible conjunct makes the whole chain impossible.
            Expression::Exclude => return Expression::Exclude,
            // Always-true conjuncts drop out.
            Expression::Include => continue,
            Expression::And(nested) => flattened.extend(nested),
            other => flattened.push(other),
        }
    }
    match flattened.len() {
        0 => Expression::Include,
        1 => flattened.remove(0),
        _ => Expression::And(flattened),
    }
}

fn simplify_or(children: &[Expression]) -> Expression {
    let mut flattened = Vec::with_capacity(children.len());
    for child in children {
        match simplify(child) {
            // One always-true disjunct makes the whole chain true.
            Expression::Include => return Expression::Include,
            Expression::Exclude => continue,
            Expression::Or(nested) => flattened.extend(nested),
            other => flattened.push(other),
        }
    }
    match flattened.len() {
        0 => Expression::Exclude,
        1 => flattened.remove(0),
        _ => Expression::Or(flattened),
    }
}
