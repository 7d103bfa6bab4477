//! Class and index metadata
//!
//! The planner resolves classes and their indexes through the [`Schema`]
//! and [`SchemaClass`] traits; the surrounding engine owns the real
//! catalog. [`MemorySchema`] is the in-process implementation used by the
//! test suite and by embedders without a catalog of their own.

use std::collections::BTreeMap;

use crate::index::{Index, IndexKind, MemoryIndex};
use crate::value::{Document, Value};

/// Class metadata the planner needs: index resolution and link targets.
pub trait SchemaClass {
    /// Class name
    fn name(&self) -> &str;

    /// Indexes whose leading columns cover exactly the given field set.
    ///
    /// Order-insensitive on the query side: an index on `(a, b, c)` covers
    /// `["b", "a"]` because its first two columns are `{a, b}`.
    fn indexes_for(&self, fields: &[&str]) -> Vec<&dyn Index>;

    /// Target class of a link-typed property, for multi-hop paths.
    fn linked_class(&self, property: &str) -> Option<&str>;
}

/// Catalog handle: class resolution by name.
pub trait Schema {
    fn class(&self, name: &str) -> Option<&dyn SchemaClass>;
}

/// In-memory class: declared link properties plus owned indexes.
#[derive(Debug, Default)]
pub struct MemoryClass {
    name: String,
    links: BTreeMap<String, String>,
    indexes: Vec<MemoryIndex>,
}

impl MemoryClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            links: BTreeMap::new(),
            indexes: Vec::new(),
        }
    }

    /// Declares a link-typed property pointing at another class.
    pub fn link_property(
        mut self,
        property: impl Into<String>,
        target_class: impl Into<String>,
    ) -> Self {
        self.links.insert(property.into(), target_class.into());
        self
    }

    /// Adds an index over the given field order.
    pub fn add_index(
        &mut self,
        name: impl Into<String>,
        fields: impl IntoIterator<Item = impl Into<String>>,
        kind: IndexKind,
    ) -> &mut MemoryIndex {
        self.indexes.push(MemoryIndex::new(name, fields, kind));
        let last = self.indexes.len() - 1;
        &mut self.indexes[last]
    }

    /// Mutable access to an index by name
    pub fn index_mut(&mut self, name: &str) -> Option<&mut MemoryIndex> {
        self.indexes.iter_mut().find(|i| i.name() == name)
    }

    /// Indexes a document into every owned index whose fields it carries.
    ///
    /// A list value under a single-column index produces one entry per
    /// element and a map under a by-value index one entry per map value.
    /// Missing columns and non-indexable values skip the entry rather
    /// than failing the write.
    pub fn index_document(&mut self, doc: &Document) {
        let Some(rid) = doc.rid() else {
            return;
        };
        for index in &mut self.indexes {
            let fields: Vec<String> = index.fields().to_vec();
            if fields.len() == 1 {
                match doc.get(&fields[0]) {
                    Some(Value::List(items)) => {
                        for item in items {
                            let _ = index.insert(vec![item.clone()], rid);
                        }
                    }
                    Some(Value::Map(map)) if index.kind() == IndexKind::MapByValue => {
                        for value in map.values() {
                            let _ = index.insert(vec![value.clone()], rid);
                        }
                    }
                    // An embedded link target is keyed by its identity.
                    Some(Value::Document(target)) => {
                        if let Some(target_rid) = target.rid() {
                            let _ = index.insert(vec![Value::Rid(target_rid)], rid);
                        }
                    }
                    Some(Value::Null) | None => {}
                    Some(value) => {
                        let _ = index.insert(vec![value.clone()], rid);
                    }
                }
                continue;
            }
            let mut key = Vec::with_capacity(fields.len());
            for field in &fields {
                match doc.get(field) {
                    Some(value) if !value.is_null() => key.push(value.clone()),
                    _ => break,
                }
            }
            if key.len() == fields.len() {
                let _ = index.insert(key, rid);
            }
        }
    }
}

impl SchemaClass for MemoryClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn indexes_for(&self, fields: &[&str]) -> Vec<&dyn Index> {
        self.indexes
            .iter()
            .filter(|index| covers(index.fields(), fields))
            .map(|index| index as &dyn Index)
            .collect()
    }

    fn linked_class(&self, property: &str) -> Option<&str> {
        self.links.get(property).map(String::as_str)
    }
}

// The index's first `fields.len()` columns must equal the queried field
// set, in any order.
fn covers(index_fields: &[String], fields: &[&str]) -> bool {
    if fields.is_empty() || index_fields.len() < fields.len() {
        return false;
    }
    index_fields[..fields.len()]
        .iter()
        .all(|column| fields.contains(&column.as_str()))
}

/// In-memory catalog of classes.
#[derive(Debug, Default)]
pub struct MemorySchema {
    classes: BTreeMap<String, MemoryClass>,
}

impl MemorySchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class, replacing any previous definition.
    pub fn add_class(&mut self, class: MemoryClass) -> &mut MemoryClass {
        let name = class.name.clone();
        self.classes.insert(name.clone(), class);
        self.classes
            .get_mut(&name)
            .unwrap_or_else(|| unreachable!("class inserted above"))
    }

    /// Mutable access to a class by name
    pub fn class_mut(&mut self, name: &str) -> Option<&mut MemoryClass> {
        self.classes.get_mut(name)
    }
}

impl Schema for MemorySchema {
    fn class(&self, name: &str) -> Option<&dyn SchemaClass> {
        self.classes.get(name).map(|c| c as &dyn SchemaClass)
    }
}
