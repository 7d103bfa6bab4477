//! Per-field range model
//!
//! A [`FieldRange`] is the normalized form of one `field <op> literal`
//! constraint: a min and max bound with per-edge inclusivity. Conjunction
//! planning merges ranges sharing a field before building composite index
//! bounds.

use std::cmp::Ordering;

use crate::value::{compare, KeyBound, Value};

/// One field's constraint as a bounded interval.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRange {
    field: String,
    min: KeyBound,
    max: KeyBound,
    min_inclusive: bool,
    max_inclusive: bool,
}

/// Outcome of merging two ranges over the same field.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeMerge {
    /// Constraints tightened into one range
    Merged(FieldRange),
    /// Provably empty intersection: nothing can match
    Contradiction,
    /// Bounds not comparable: the field cannot use an index
    Incompatible,
}

impl FieldRange {
    /// Equality constraint: min and max are the same value, both edges
    /// inclusive.
    pub fn point(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            min: KeyBound::Exact(value.clone()),
            max: KeyBound::Exact(value),
            min_inclusive: true,
            max_inclusive: true,
        }
    }

    /// `field < value` (or `<=` when inclusive)
    pub fn below(field: impl Into<String>, value: Value, inclusive: bool) -> Self {
        Self {
            field: field.into(),
            min: KeyBound::Lowest,
            max: KeyBound::Exact(value),
            min_inclusive: true,
            max_inclusive: inclusive,
        }
    }

    /// `field > value` (or `>=` when inclusive)
    pub fn above(field: impl Into<String>, value: Value, inclusive: bool) -> Self {
        Self {
            field: field.into(),
            min: KeyBound::Exact(value),
            max: KeyBound::Highest,
            min_inclusive: inclusive,
            max_inclusive: true,
        }
    }

    /// `field BETWEEN min AND max`, both edges inclusive
    pub fn between(field: impl Into<String>, min: Value, max: Value) -> Self {
        Self {
            field: field.into(),
            min: KeyBound::Exact(min),
            max: KeyBound::Exact(max),
            min_inclusive: true,
            max_inclusive: true,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn min(&self) -> &KeyBound {
        &self.min
    }

    pub fn max(&self) -> &KeyBound {
        &self.max
    }

    pub fn min_inclusive(&self) -> bool {
        self.min_inclusive
    }

    pub fn max_inclusive(&self) -> bool {
        self.max_inclusive
    }

    /// True for an equality constraint (min and max the same exact value)
    pub fn is_pointal(&self) -> bool {
        match (&self.min, &self.max) {
            (KeyBound::Exact(a), KeyBound::Exact(b)) => {
                self.min_inclusive
                    && self.max_inclusive
                    && compare(a, b) == Some(Ordering::Equal)
            }
            _ => false,
        }
    }

    /// Tests a value against the range; incomparable means outside.
    pub fn contains(&self, value: &Value) -> bool {
        let probe = KeyBound::Exact(value.clone());
        let above_min = match self.min.compare(&probe) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => self.min_inclusive,
            _ => false,
        };
        if !above_min {
            return false;
        }
        match self.max.compare(&probe) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => self.max_inclusive,
            _ => false,
        }
    }

    /// Merges another range over the same field into a tighter one.
    pub fn merge(&self, other: &FieldRange) -> RangeMerge {
        let (min, min_inclusive) = match self.min.compare(&other.min) {
            None => return RangeMerge::Incompatible,
            Some(Ordering::Less) => (other.min.clone(), other.min_inclusive),
            Some(Ordering::Greater) => (self.min.clone(), self.min_inclusive),
            // Equal bounds: the exclusive edge wins.
            Some(Ordering::Equal) => {
                (self.min.clone(), self.min_inclusive && other.min_inclusive)
            }
        };
        let (max, max_inclusive) = match self.max.compare(&other.max) {
            None => return RangeMerge::Incompatible,
            Some(Ordering::Greater) => (other.max.clone(), other.max_inclusive),
            Some(Ordering::Less) => (self.max.clone(), self.max_inclusive),
            Some(Ordering::Equal) => {
                (self.max.clone(), self.max_inclusive && other.max_inclusive)
            }
        };
        match min.compare(&max) {
            None => RangeMerge::Incompatible,
            Some(Ordering::Greater) => RangeMerge::Contradiction,
            Some(Ordering::Equal) if !(min_inclusive && max_inclusive) => {
                RangeMerge::Contradiction
            }
            Some(_) => RangeMerge::Merged(FieldRange {
                field: self.field.clone(),
                min,
                max,
                min_inclusive,
                max_inclusive,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointal() {
        assert!(FieldRange::point("a", Value::Long(5)).is_pointal());
        assert!(!FieldRange::above("a", Value::Long(5), true).is_pointal());
        assert!(!FieldRange::between("a", Value::Long(1), Value::Long(2)).is_pointal());
        // Cross-width equality still counts as pointal.
        let range = FieldRange::between("a", Value::Long(5), Value::Double(5.0));
        assert!(range.is_pointal());
    }

    #[test]
    fn test_contains_edges() {
        let range = FieldRange::between("a", Value::Long(1), Value::Long(10));
        assert!(range.contains(&Value::Long(1)));
        assert!(range.contains(&Value::Long(10)));
        assert!(!range.contains(&Value::Long(0)));
        assert!(!range.contains(&Value::Long(11)));

        let open = FieldRange::above("a", Value::Long(5), false);
        assert!(!open.contains(&Value::Long(5)));
        assert!(open.contains(&Value::Long(6)));
    }

    #[test]
    fn test_contains_incomparable_is_outside() {
        let range = FieldRange::above("a", Value::Long(5), true);
        assert!(!range.contains(&Value::Bool(true)));
        assert!(!range.contains(&Value::Null));
    }

    #[test]
    fn test_merge_tightens() {
        let above = FieldRange::above("a", Value::Long(5), true);
        let below = FieldRange::below("a", Value::Long(10), false);
        match above.merge(&below) {
            RangeMerge::Merged(merged) => {
                assert_eq!(merged.min(), &KeyBound::Exact(Value::Long(5)));
                assert_eq!(merged.max(), &KeyBound::Exact(Value::Long(10)));
                assert!(merged.min_inclusive());
                assert!(!merged.max_inclusive());
            }
            other => panic!("expected merge, got {other:?}"),
        }
    }

    #[test]
    fn test_merge_equal_bound_exclusive_wins() {
        let closed = FieldRange::above("a", Value::Long(5), true);
        let open = FieldRange::above("a", Value::Long(5), false);
        match closed.merge(&open) {
            RangeMerge::Merged(merged) => assert!(!merged.min_inclusive()),
            other => panic!("expected merge, got {other:?}"),
        }
    }

    #[test]
    fn test_merge_contradiction() {
        let a = FieldRange::point("a", Value::Long(1));
        let b = FieldRange::point("a", Value::Long(2));
        assert_eq!(a.merge(&b), RangeMerge::Contradiction);

        // Touching edges with one exclusive side cannot both hold.
        let upper = FieldRange::below("a", Value::Long(5), false);
        let lower = FieldRange::above("a", Value::Long(5), true);
        assert_eq!(upper.merge(&lower), RangeMerge::Contradiction);
    }

    #[test]
    fn test_merge_incompatible() {
        let number = FieldRange::point("a", Value::Long(1));
        let text = FieldRange::point("a", Value::String("x".into()));
        assert_eq!(number.merge(&text), RangeMerge::Incompatible);
    }
}
