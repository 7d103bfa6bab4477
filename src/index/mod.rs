//! Secondary-index interface
//!
//! The planner consumes indexes through the [`Index`] trait: point and
//! range lookups over composite bounds plus enough introspection to decide
//! applicability (field order, arity, uniqueness/fulltext classification).
//! Lookups are synchronous and return a stable snapshot of matching record
//! ids for the duration of one plan computation; a lookup error means the
//! index is not usable for that node, never a planning failure.

mod errors;
mod memory;

pub use errors::{IndexError, IndexResult};
pub use memory::MemoryIndex;

use std::collections::BTreeSet;

use crate::value::{CompositeKey, RecordId, Value};

/// Index classification the planner dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// At most one record per key; `!=` can produce an exclusion set
    Unique,
    /// Any number of records per key
    NotUnique,
    /// Token index usable by text containment only
    Fulltext,
    /// Map index keyed by entry values
    MapByValue,
}

impl IndexKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Unique => "UNIQUE",
            IndexKind::NotUnique => "NOTUNIQUE",
            IndexKind::Fulltext => "FULLTEXT",
            IndexKind::MapByValue => "MAP_BY_VALUE",
        }
    }
}

/// One secondary index over one class.
pub trait Index {
    /// Index name (diagnostics and statistics)
    fn name(&self) -> &str;

    /// Declared field order
    fn fields(&self) -> &[String];

    /// Classification
    fn kind(&self) -> IndexKind;

    /// Number of key columns
    fn key_arity(&self) -> usize {
        self.fields().len()
    }

    /// Record ids for any of the given keys (exact match).
    fn point_lookup(&self, keys: &[Value]) -> IndexResult<BTreeSet<RecordId>>;

    /// Record ids with keys inside `[min, max]`, per-edge inclusivity.
    fn range_lookup(
        &self,
        min: &CompositeKey,
        max: &CompositeKey,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> IndexResult<BTreeSet<RecordId>>;

    /// Record ids with keys below the given key.
    fn below(&self, key: &Value, inclusive: bool) -> IndexResult<BTreeSet<RecordId>>;

    /// Record ids with keys above the given key.
    fn above(&self, key: &Value, inclusive: bool) -> IndexResult<BTreeSet<RecordId>>;
}
