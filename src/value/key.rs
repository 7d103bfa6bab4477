//! Composite keys for multi-column indexes
//!
//! A composite key is an ordered tuple of per-column bounds aligned to an
//! index's declared field order. Unconstrained columns carry the explicit
//! `Lowest`/`Highest` bounds instead of sentinel values smuggled through the
//! value type, so comparisons stay exhaustive.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{compare, Value};

/// One column of a composite key.
///
/// `Lowest` compares below every value, `Highest` above every value; they
/// stand for the unconstrained ends of a partial key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KeyBound {
    /// Unbounded below: less than every value
    Lowest,
    /// An exact column value
    Exact(Value),
    /// Unbounded above: greater than every value
    Highest,
}

impl KeyBound {
    /// Returns the exact value, if this bound carries one
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            KeyBound::Exact(v) => Some(v),
            _ => None,
        }
    }

    /// Compares two bounds; `None` when both are exact but incomparable.
    pub fn compare(&self, other: &KeyBound) -> Option<Ordering> {
        match (self, other) {
            (KeyBound::Lowest, KeyBound::Lowest) => Some(Ordering::Equal),
            (KeyBound::Lowest, _) => Some(Ordering::Less),
            (_, KeyBound::Lowest) => Some(Ordering::Greater),
            (KeyBound::Highest, KeyBound::Highest) => Some(Ordering::Equal),
            (KeyBound::Highest, _) => Some(Ordering::Greater),
            (_, KeyBound::Highest) => Some(Ordering::Less),
            (KeyBound::Exact(a), KeyBound::Exact(b)) => compare(a, b),
        }
    }
}

/// Ordered tuple of column bounds matching an index's field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeKey {
    columns: Vec<KeyBound>,
}

impl CompositeKey {
    /// Creates a key from explicit column bounds
    pub fn new(columns: Vec<KeyBound>) -> Self {
        Self { columns }
    }

    /// Creates a key of exact values
    pub fn of(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            columns: values.into_iter().map(KeyBound::Exact).collect(),
        }
    }

    /// Creates a 1-ary key from a single value
    pub fn single(value: Value) -> Self {
        Self::of([value])
    }

    /// Column bounds in index field order
    pub fn columns(&self) -> &[KeyBound] {
        &self.columns
    }

    /// Number of columns
    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    /// Compares two keys over their common prefix.
    ///
    /// Keys of different arity that agree on the shared prefix compare
    /// equal; this is what makes partial keys match composite entries.
    /// `None` when a shared column pair is incomparable.
    pub fn compare(&self, other: &CompositeKey) -> Option<Ordering> {
        for (a, b) in self.columns.iter().zip(other.columns.iter()) {
            match a.compare(b)? {
                Ordering::Equal => continue,
                non_equal => return Some(non_equal),
            }
        }
        Some(Ordering::Equal)
    }
}

impl From<Vec<Value>> for CompositeKey {
    fn from(values: Vec<Value>) -> Self {
        CompositeKey::of(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_order_around_values() {
        let v = KeyBound::Exact(Value::Long(5));
        assert_eq!(KeyBound::Lowest.compare(&v), Some(Ordering::Less));
        assert_eq!(KeyBound::Highest.compare(&v), Some(Ordering::Greater));
        assert_eq!(v.compare(&KeyBound::Lowest), Some(Ordering::Greater));
        assert_eq!(v.compare(&KeyBound::Highest), Some(Ordering::Less));
    }

    #[test]
    fn test_prefix_comparison() {
        let full = CompositeKey::of([Value::Long(5), Value::Long(10)]);
        let prefix = CompositeKey::single(Value::Long(5));
        assert_eq!(prefix.compare(&full), Some(Ordering::Equal));

        let other = CompositeKey::single(Value::Long(6));
        assert_eq!(other.compare(&full), Some(Ordering::Greater));
    }

    #[test]
    fn test_column_order_decides() {
        let a = CompositeKey::of([Value::Long(1), Value::Long(9)]);
        let b = CompositeKey::of([Value::Long(2), Value::Long(0)]);
        assert_eq!(a.compare(&b), Some(Ordering::Less));
    }

    #[test]
    fn test_incomparable_column() {
        let a = CompositeKey::single(Value::Long(1));
        let b = CompositeKey::single(Value::Bool(true));
        assert_eq!(a.compare(&b), None);
    }
}
