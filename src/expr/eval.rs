//! Direct interpreter
//!
//! Evaluates an expression against one candidate value. This path must
//! agree exactly with the index-optimized path on every input: the planner
//! only ever narrows the candidate set, and anything it reports as a
//! candidate is confirmed here. Incomparable operands make a comparison
//! false, never an error.

use crate::value::{compare, equals, Value};

use super::{EvalContext, Expression};

impl Expression {
    /// Evaluates this node against a candidate.
    ///
    /// Predicates yield `Bool`; accessors yield whatever they resolve to,
    /// `Null` when nothing does.
    pub fn evaluate(&self, ctx: &EvalContext, candidate: &Value) -> Value {
        match self {
            Expression::Literal(value) => value.clone(),
            Expression::Include => Value::Bool(true),
            Expression::Exclude => Value::Bool(false),

            Expression::Field(name) => resolve_field(ctx, candidate, name),

            Expression::Path(left, right) => {
                let base = left.evaluate(ctx, candidate);
                right.evaluate(ctx, &base)
            }

            Expression::Collection(children) => Value::List(
                children.iter().map(|c| c.evaluate(ctx, candidate)).collect(),
            ),

            Expression::And(children) => {
                for child in children {
                    // A non-boolean operand cannot participate in a
                    // conjunction and fails the whole chain.
                    match child.evaluate(ctx, candidate) {
                        Value::Bool(true) => continue,
                        _ => return Value::Bool(false),
                    }
                }
                Value::Bool(true)
            }

            Expression::Or(children) => {
                for child in children {
                    if child.evaluate(ctx, candidate).is_true() {
                        return Value::Bool(true);
                    }
                }
                Value::Bool(false)
            }

            Expression::Equals(left, right) => {
                let l = left.evaluate(ctx, candidate);
                let r = right.evaluate(ctx, candidate);
                Value::Bool(equals(&l, &r))
            }

            Expression::NotEquals(left, right) => {
                let l = left.evaluate(ctx, candidate);
                let r = right.evaluate(ctx, candidate);
                Value::Bool(!equals(&l, &r))
            }

            Expression::Inferior(left, right) => {
                Value::Bool(ordering_matches(left, right, ctx, candidate, |o| o.is_lt()))
            }
            Expression::InferiorEquals(left, right) => {
                Value::Bool(ordering_matches(left, right, ctx, candidate, |o| o.is_le()))
            }
            Expression::Superior(left, right) => {
                Value::Bool(ordering_matches(left, right, ctx, candidate, |o| o.is_gt()))
            }
            Expression::SuperiorEquals(left, right) => {
                Value::Bool(ordering_matches(left, right, ctx, candidate, |o| o.is_ge()))
            }

            Expression::Between(target, min, max) => {
                let t = target.evaluate(ctx, candidate);
                let lo = min.evaluate(ctx, candidate);
                let hi = max.evaluate(ctx, candidate);
                let above_min = matches!(compare(&t, &lo), Some(o) if o.is_ge());
                let below_max = matches!(compare(&t, &hi), Some(o) if o.is_le());
                Value::Bool(above_min && below_max)
            }

            Expression::In(left, right) => evaluate_in(left, right, ctx, candidate),

            Expression::Contains(left, right) => {
                evaluate_contains(left, right, ctx, candidate)
            }

            Expression::ContainsText {
                left,
                right,
                ignore_case,
            } => {
                let l = left.evaluate(ctx, candidate);
                let r = right.evaluate(ctx, candidate);
                match (l, r) {
                    (Value::String(mut text), Value::String(mut needle)) => {
                        if *ignore_case {
                            text = text.to_lowercase();
                            needle = needle.to_lowercase();
                        }
                        Value::Bool(text.contains(&needle))
                    }
                    _ => Value::Bool(false),
                }
            }

            Expression::ContainsValue(left, right) => {
                evaluate_contains_value(left, right, ctx, candidate)
            }

            Expression::Filtered(children) => evaluate_filtered(children, ctx, candidate),
        }
    }
}

fn resolve_field(ctx: &EvalContext, candidate: &Value, name: &str) -> Value {
    match candidate {
        Value::Document(doc) => doc.get(name).cloned().unwrap_or(Value::Null),
        Value::Map(map) => map.get(name).cloned().unwrap_or(Value::Null),
        _ => ctx.variable(name).cloned().unwrap_or(Value::Null),
    }
}

fn ordering_matches(
    left: &Expression,
    right: &Expression,
    ctx: &EvalContext,
    candidate: &Value,
    accept: impl Fn(std::cmp::Ordering) -> bool,
) -> bool {
    let l = left.evaluate(ctx, candidate);
    let r = right.evaluate(ctx, candidate);
    match compare(&l, &r) {
        Some(ordering) => accept(ordering),
        None => false,
    }
}

fn evaluate_in(
    left: &Expression,
    right: &Expression,
    ctx: &EvalContext,
    candidate: &Value,
) -> Value {
    let l = left.evaluate(ctx, candidate);

    // Flatten the right side into a list of values: a literal collection
    // evaluates element-wise, anything else coerces its evaluation.
    let rights: Vec<Value> = match right {
        Expression::Collection(children) => {
            children.iter().map(|c| c.evaluate(ctx, candidate)).collect()
        }
        other => match other.evaluate(ctx, candidate) {
            Value::List(items) => items,
            single => vec![single],
        },
    };

    let matched = match &l {
        // A collection-valued left side matches when any element does.
        Value::List(items) => items
            .iter()
            .any(|item| rights.iter().any(|r| equals(item, r))),
        single => rights.iter().any(|r| equals(single, r)),
    };
    Value::Bool(matched)
}

fn evaluate_contains(
    left: &Expression,
    right: &Expression,
    ctx: &EvalContext,
    candidate: &Value,
) -> Value {
    let l = left.evaluate(ctx, candidate);

    if matches!(right, Expression::Literal(_)) {
        let r = right.evaluate(ctx, candidate);
        let matched = match &l {
            Value::List(items) => items.iter().any(|item| equals(item, &r)),
            other => equals(other, &r),
        };
        return Value::Bool(matched);
    }

    // Not a literal: the right side is a nested predicate evaluated with
    // each element as candidate.
    let matched = match &l {
        Value::List(items) => items
            .iter()
            .any(|item| right.evaluate(ctx, item).is_true()),
        other => right.evaluate(ctx, other).is_true(),
    };
    Value::Bool(matched)
}

fn evaluate_contains_value(
    left: &Expression,
    right: &Expression,
    ctx: &EvalContext,
    candidate: &Value,
) -> Value {
    let l = left.evaluate(ctx, candidate);
    let Value::Map(map) = &l else {
        return Value::Bool(false);
    };

    let matched = if matches!(right, Expression::Literal(_)) {
        let r = right.evaluate(ctx, candidate);
        map.values().any(|v| equals(v, &r))
    } else {
        map.values().any(|v| right.evaluate(ctx, v).is_true())
    };
    Value::Bool(matched)
}

// The overloaded accessor: depending on the source value and the filter
// operand this is a document/map/list accessor, a sub-path evaluation, a
// slice, or an element-wise filter collapsing to a scalar on one match.
fn evaluate_filtered(children: &[Expression], ctx: &EvalContext, candidate: &Value) -> Value {
    let Some(source) = children.first() else {
        return Value::Null;
    };
    let left = source.evaluate(ctx, candidate);

    // Three operands: inclusive slice of a collection.
    if children.len() == 3 {
        let Value::List(items) = &left else {
            return Value::Null;
        };
        let from = children[1].evaluate(ctx, candidate);
        let to = children[2].evaluate(ctx, candidate);
        let (Some(from), Some(to)) = (index_of(&from), index_of(&to)) else {
            return Value::Null;
        };
        if from > to || to >= items.len() {
            return Value::Null;
        }
        return Value::List(items[from..=to].to_vec());
    }

    let Some(filter) = children.get(1) else {
        return left;
    };

    match (&left, filter) {
        (Value::Document(doc), Expression::Literal(key)) => {
            let name = match key {
                Value::String(s) => s.clone(),
                other => format!("{other:?}"),
            };
            return doc.get(&name).cloned().unwrap_or(Value::Null);
        }
        (Value::Document(_), Expression::Field(_) | Expression::Path(_, _)) => {
            return filter.evaluate(ctx, &left);
        }
        (Value::List(items), Expression::Field(_) | Expression::Path(_, _)) => {
            let mut picked: Vec<Value> = items
                .iter()
                .map(|item| filter.evaluate(ctx, item))
                .filter(|v| !v.is_null())
                .collect();
            return if picked.len() == 1 {
                picked.pop().unwrap_or(Value::Null)
            } else {
                Value::List(picked)
            };
        }
        (Value::Map(map), Expression::Literal(key)) => {
            let Value::String(name) = key else {
                return Value::Null;
            };
            return map.get(name).cloned().unwrap_or(Value::Null);
        }
        (Value::List(items), Expression::Literal(_)) => {
            let index = filter.evaluate(ctx, candidate);
            return match index_of(&index) {
                Some(i) => items.get(i).cloned().unwrap_or(Value::Null),
                None => Value::Null,
            };
        }
        _ => {}
    }

    // Element-wise filter; maps filter over their values.
    let elements: Vec<Value> = match left {
        Value::Map(map) => map.into_values().collect(),
        Value::List(items) => items,
        other => vec![other],
    };
    let mut matched: Vec<Value> = elements
        .into_iter()
        .filter(|elem| filter.evaluate(ctx, elem).is_true())
        .collect();
    match matched.len() {
        0 => Value::Null,
        1 => matched.pop().unwrap_or(Value::Null),
        _ => Value::List(matched),
    }
}

fn index_of(value: &Value) -> Option<usize> {
    let i = value.as_i64()?;
    usize::try_from(i).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Document, RecordId};

    fn doc() -> Value {
        Value::Document(
            Document::new()
                .with_rid(RecordId::new(1, 0))
                .field("name", "Alice")
                .field("age", 30i64)
                .field("score", 4.5f64),
        )
    }

    fn eval(expr: &Expression) -> Value {
        expr.evaluate(&EvalContext::new(), &doc())
    }

    #[test]
    fn test_and_short_circuits_on_non_boolean() {
        let expr = Expression::and([
            Expression::literal(1i64), // not a boolean
            Expression::equals(Expression::field("age"), Expression::literal(30i64)),
        ]);
        assert_eq!(eval(&expr), Value::Bool(false));
    }

    #[test]
    fn test_and_or_basic() {
        let eq = Expression::equals(Expression::field("age"), Expression::literal(30i64));
        let ne = Expression::equals(Expression::field("age"), Expression::literal(31i64));
        assert_eq!(
            eval(&Expression::and([eq.clone(), ne.clone()])),
            Value::Bool(false)
        );
        assert_eq!(eval(&Expression::or([ne, eq])), Value::Bool(true));
    }

    #[test]
    fn test_between_edges_inclusive() {
        let between = |v: i64| {
            Expression::between(
                Expression::literal(v),
                Expression::literal(1i64),
                Expression::literal(10i64),
            )
        };
        assert_eq!(eval(&between(1)), Value::Bool(true));
        assert_eq!(eval(&between(10)), Value::Bool(true));
        assert_eq!(eval(&between(0)), Value::Bool(false));
        assert_eq!(eval(&between(11)), Value::Bool(false));
    }

    #[test]
    fn test_incomparable_is_false() {
        let expr = Expression::inferior(
            Expression::field("name"), // a string
            Expression::literal(10i64),
        );
        assert_eq!(eval(&expr), Value::Bool(false));
    }

    #[test]
    fn test_in_collection_literal() {
        let rhs = Expression::Collection(vec![
            Expression::literal(1i64),
            Expression::literal(2i64),
            Expression::literal(3i64),
        ]);
        let hit = Expression::in_(Expression::literal(2i64), rhs.clone());
        let miss = Expression::in_(Expression::literal(4i64), rhs);
        assert_eq!(eval(&hit), Value::Bool(true));
        assert_eq!(eval(&miss), Value::Bool(false));
    }

    #[test]
    fn test_in_collection_valued_left() {
        let rhs = Expression::Collection(vec![
            Expression::literal(1i64),
            Expression::literal(2i64),
        ]);
        let lhs = Expression::literal(Value::List(vec![Value::Long(9), Value::Long(2)]));
        assert_eq!(eval(&Expression::in_(lhs, rhs)), Value::Bool(true));
    }

    #[test]
    fn test_contains_literal_and_filter() {
        let list = Expression::literal(Value::List(vec![
            Value::Long(1),
            Value::Long(5),
            Value::Long(9),
        ]));
        let by_value = Expression::contains(list.clone(), Expression::literal(5i64));
        assert_eq!(eval(&by_value), Value::Bool(true));
        let miss = Expression::contains(list, Expression::literal(7i64));
        assert_eq!(eval(&miss), Value::Bool(false));

        // Nested predicate: each element becomes the candidate.
        let people = Expression::literal(Value::List(vec![
            Value::Document(Document::new().field("age", 10i64)),
            Value::Document(Document::new().field("age", 40i64)),
        ]));
        let by_filter = Expression::contains(
            people,
            Expression::superior(Expression::field("age"), Expression::literal(30i64)),
        );
        assert_eq!(eval(&by_filter), Value::Bool(true));
    }

    #[test]
    fn test_contains_text_case() {
        let expr = Expression::contains_text(
            Expression::field("name"),
            Expression::literal("LIC"),
            true,
        );
        assert_eq!(eval(&expr), Value::Bool(true));

        let strict = Expression::contains_text(
            Expression::field("name"),
            Expression::literal("LIC"),
            false,
        );
        assert_eq!(eval(&strict), Value::Bool(false));
    }

    #[test]
    fn test_contains_value_on_map() {
        let mut map = std::collections::BTreeMap::new();
        map.insert("a".to_string(), Value::Long(1));
        map.insert("b".to_string(), Value::Long(2));
        let expr = Expression::contains_value(
            Expression::literal(Value::Map(map)),
            Expression::literal(2i64),
        );
        assert_eq!(eval(&expr), Value::Bool(true));
    }

    #[test]
    fn test_filtered_document_accessor() {
        let expr = Expression::filtered(
            Expression::Literal(doc()),
            Expression::literal("name"),
        );
        assert_eq!(
            expr.evaluate(&EvalContext::new(), &Value::Null),
            Value::String("Alice".into())
        );
    }

    #[test]
    fn test_filtered_list_index_and_slice() {
        let list = Expression::literal(Value::List(vec![
            Value::Long(10),
            Value::Long(20),
            Value::Long(30),
            Value::Long(40),
        ]));
        let indexed = Expression::filtered(list.clone(), Expression::literal(2i64));
        assert_eq!(eval(&indexed), Value::Long(30));

        let sliced = Expression::slice(
            list,
            Expression::literal(1i64),
            Expression::literal(2i64),
        );
        assert_eq!(
            eval(&sliced),
            Value::List(vec![Value::Long(20), Value::Long(30)])
        );
    }

    #[test]
    fn test_filtered_element_filter_scalar_collapse() {
        let alice = Document::new().field("n", 1i64);
        let bob = Document::new().field("n", 8i64);
        let carol = Document::new().field("n", 3i64);
        let list = Expression::literal(Value::List(vec![
            Value::Document(alice),
            Value::Document(bob.clone()),
            Value::Document(carol),
        ]));
        let expr = Expression::filtered(
            list,
            Expression::superior(Expression::field("n"), Expression::literal(5i64)),
        );
        // Exactly one element matches: scalar, not a list.
        assert_eq!(eval(&expr), Value::Document(bob));
    }

    #[test]
    fn test_path_chained_access() {
        let inner = Document::new().field("city", "Paris");
        let outer = Value::Document(Document::new().field("address", inner));
        let expr = Expression::path(Expression::field("address"), Expression::field("city"));
        assert_eq!(
            expr.evaluate(&EvalContext::new(), &outer),
            Value::String("Paris".into())
        );
    }
}
