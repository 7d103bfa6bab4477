//! BTreeMap-backed reference index
//!
//! Keys live in a BTreeMap under a total storage order (type rank, then
//! value; floats by total bit order) so iteration is deterministic. Lookup
//! correctness does not depend on that order: every probe tests candidates
//! with the cross-type comparison semantics of [`crate::value`], so a
//! `Long 5` probe finds a `Double 5.0` entry.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::value::{CompositeKey, KeyBound, RecordId, Value};

use super::{Index, IndexError, IndexKind, IndexResult};

/// In-memory secondary index used by the test suite and by embedders
/// without their own catalog.
#[derive(Debug)]
pub struct MemoryIndex {
    name: String,
    fields: Vec<String>,
    kind: IndexKind,
    entries: BTreeMap<StorageKey, BTreeSet<RecordId>>,
}

impl MemoryIndex {
    /// Creates an empty index over the given field order.
    pub fn new(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = impl Into<String>>,
        kind: IndexKind,
    ) -> Self {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            kind,
            entries: BTreeMap::new(),
        }
    }

    /// Single-column convenience constructor.
    pub fn single(name: impl Into<String>, field: impl Into<String>, kind: IndexKind) -> Self {
        Self::new(name, [field], kind)
    }

    /// Inserts a key/record pair.
    ///
    /// The key must match the index arity and contain only orderable
    /// scalar components.
    pub fn insert(&mut self, key: Vec<Value>, rid: RecordId) -> IndexResult<()> {
        if key.len() != self.fields.len() {
            return Err(IndexError::arity_mismatch(self.fields.len(), key.len()));
        }
        for component in &key {
            if !is_indexable(component) {
                return Err(IndexError::unsupported_key(format!("{component:?}")));
            }
        }
        self.entries
            .entry(StorageKey(CompositeKey::of(key)))
            .or_default()
            .insert(rid);
        Ok(())
    }

    /// Removes a key/record pair; missing pairs are ignored.
    pub fn remove(&mut self, key: &[Value], rid: RecordId) {
        let storage = StorageKey(CompositeKey::of(key.to_vec()));
        if let Some(ids) = self.entries.get_mut(&storage) {
            ids.remove(&rid);
            if ids.is_empty() {
                self.entries.remove(&storage);
            }
        }
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn collect<F>(&self, mut accept: F) -> BTreeSet<RecordId>
    where
        F: FnMut(&CompositeKey) -> bool,
    {
        let mut out = BTreeSet::new();
        for (key, ids) in &self.entries {
            if accept(&key.0) {
                out.extend(ids.iter().copied());
            }
        }
        out
    }
}

impl Index for MemoryIndex {
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn kind(&self) -> IndexKind {
        self.kind
    }

    fn point_lookup(&self, keys: &[Value]) -> IndexResult<BTreeSet<RecordId>> {
        // Fulltext lookups match stored text containing the probe, which
        // is what the planner relies on for text containment predicates.
        if self.kind == IndexKind::Fulltext {
            return Ok(self.collect(|stored| {
                let Some(KeyBound::Exact(Value::String(text))) = stored.columns().first()
                else {
                    return false;
                };
                keys.iter().any(|probe| match probe {
                    Value::String(needle) => text.contains(needle.as_str()),
                    _ => false,
                })
            }));
        }
        let probes: Vec<CompositeKey> = keys
            .iter()
            .map(|k| CompositeKey::single(k.clone()))
            .collect();
        Ok(self.collect(|stored| {
            probes
                .iter()
                .any(|probe| probe.compare(stored) == Some(Ordering::Equal))
        }))
    }

    fn range_lookup(
        &self,
        min: &CompositeKey,
        max: &CompositeKey,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> IndexResult<BTreeSet<RecordId>> {
        if min.arity() != self.fields.len() || max.arity() != self.fields.len() {
            return Err(IndexError::arity_mismatch(
                self.fields.len(),
                min.arity().max(max.arity()),
            ));
        }
        Ok(self.collect(|stored| {
            let above_min = match min.compare(stored) {
                Some(Ordering::Less) => true,
                Some(Ordering::Equal) => min_inclusive,
                _ => false,
            };
            if !above_min {
                return false;
            }
            match max.compare(stored) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Equal) => max_inclusive,
                _ => false,
            }
        }))
    }

    fn below(&self, key: &Value, inclusive: bool) -> IndexResult<BTreeSet<RecordId>> {
        if self.fields.len() != 1 {
            return Err(IndexError::arity_mismatch(1, self.fields.len()));
        }
        let bound = CompositeKey::single(key.clone());
        Ok(self.collect(|stored| match stored.compare(&bound) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => inclusive,
            _ => false,
        }))
    }

    fn above(&self, key: &Value, inclusive: bool) -> IndexResult<BTreeSet<RecordId>> {
        if self.fields.len() != 1 {
            return Err(IndexError::arity_mismatch(1, self.fields.len()));
        }
        let bound = CompositeKey::single(key.clone());
        Ok(self.collect(|stored| match stored.compare(&bound) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => inclusive,
            _ => false,
        }))
    }
}

fn is_indexable(value: &Value) -> bool {
    matches!(
        value,
        Value::Bool(_)
            | Value::Int(_)
            | Value::Long(_)
            | Value::Float(_)
            | Value::Double(_)
            | Value::String(_)
            | Value::Rid(_)
            | Value::DateTime(_)
    )
}

// Storage ordering: deterministic and total, independent of the semantic
// comparison used by probes.
#[derive(Debug, Clone)]
struct StorageKey(CompositeKey);

impl PartialEq for StorageKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for StorageKey {}

impl PartialOrd for StorageKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StorageKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = self.0.columns();
        let b = other.0.columns();
        for (x, y) in a.iter().zip(b.iter()) {
            let ordering = storage_bound_cmp(x, y);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        a.len().cmp(&b.len())
    }
}

fn storage_bound_cmp(a: &KeyBound, b: &KeyBound) -> Ordering {
    match (a, b) {
        (KeyBound::Lowest, KeyBound::Lowest) => Ordering::Equal,
        (KeyBound::Lowest, _) => Ordering::Less,
        (_, KeyBound::Lowest) => Ordering::Greater,
        (KeyBound::Highest, KeyBound::Highest) => Ordering::Equal,
        (KeyBound::Highest, _) => Ordering::Greater,
        (_, KeyBound::Highest) => Ordering::Less,
        (KeyBound::Exact(x), KeyBound::Exact(y)) => storage_value_cmp(x, y),
    }
}

fn storage_value_cmp(a: &Value, b: &Value) -> Ordering {
    if a.is_number() && b.is_number() {
        let fa = a.as_f64().unwrap_or(f64::NAN);
        let fb = b.as_f64().unwrap_or(f64::NAN);
        return fa.total_cmp(&fb).then_with(|| width_rank(a).cmp(&width_rank(b)));
    }
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Rid(x), Value::Rid(y)) => x.cmp(y),
        (Value::DateTime(x), Value::DateTime(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Double(_) => 2,
        Value::String(_) => 3,
        Value::Rid(_) => 4,
        Value::DateTime(_) => 5,
        Value::List(_) => 6,
        Value::Map(_) => 7,
        Value::Document(_) => 8,
        Value::Key(_) => 9,
    }
}

fn width_rank(value: &Value) -> u8 {
    match value {
        Value::Int(_) => 0,
        Value::Long(_) => 1,
        Value::Float(_) => 2,
        Value::Double(_) => 3,
        _ => 4,
    }
}
