//! Value model and comparison semantics
//!
//! Everything a filter expression can produce or consume: nulls, booleans,
//! four numeric widths, strings, record ids, datetimes, lists, maps,
//! documents and composite keys. Equality and ordering are cross-type:
//! numeric comparisons collapse to the less precise operand width, strings
//! coerce to record ids when compared against one, and incomparable pairs
//! are reported as such (`None`) rather than raising; every predicate maps
//! "incomparable" to false.

mod key;
mod rid;

pub use key::{CompositeKey, KeyBound};
pub use rid::{RecordId, RidParseError};

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Absent / null
    Null,
    /// Boolean
    Bool(bool),
    /// 32-bit integer
    Int(i32),
    /// 64-bit integer
    Long(i64),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// UTF-8 string
    String(String),
    /// Record identifier
    Rid(RecordId),
    /// Timestamp (UTC)
    DateTime(DateTime<Utc>),
    /// Ordered collection
    List(Vec<Value>),
    /// String-keyed map
    Map(BTreeMap<String, Value>),
    /// Embedded or stored document
    Document(Document),
    /// Composite index key
    Key(CompositeKey),
}

impl Value {
    /// True for `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for any numeric variant
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Double(_)
        )
    }

    /// Numeric value widened to `i64`, if integral
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(i64::from(*v)),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value widened to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(f64::from(*v)),
            Value::Long(v) => Some(*v as f64),
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value narrowed to `f32`
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Int(v) => Some(*v as f32),
            Value::Long(v) => Some(*v as f32),
            Value::Float(v) => Some(*v),
            Value::Double(v) => Some(*v as f32),
            _ => None,
        }
    }

    /// True when the value evaluates as boolean true
    pub fn is_true(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    /// Converts a JSON value.
    ///
    /// Integers become `Long`, other numbers `Double`; objects become
    /// `Map` (use [`Document::from_json`] for record bodies).
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Long(i)
                } else {
                    Value::Double(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                Value::List(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(fields) => Value::Map(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<RecordId> for Value {
    fn from(v: RecordId) -> Self {
        Value::Rid(v)
    }
}

/// A record body: named fields plus an optional identity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    rid: Option<RecordId>,
    fields: BTreeMap<String, Value>,
}

impl Document {
    /// Creates an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the record identity
    pub fn with_rid(mut self, rid: RecordId) -> Self {
        self.rid = Some(rid);
        self
    }

    /// Sets a field (builder style)
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Record identity, if stored
    pub fn rid(&self) -> Option<RecordId> {
        self.rid
    }

    /// Field value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Field iterator in name order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the document has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The only field value, when the document has exactly one field
    pub fn single_field_value(&self) -> Option<&Value> {
        if self.fields.len() == 1 {
            self.fields.values().next()
        } else {
            None
        }
    }

    /// Builds a document from a JSON object; `None` for non-objects.
    pub fn from_json(json: &serde_json::Value) -> Option<Document> {
        let object = json.as_object()?;
        let mut doc = Document::new();
        for (name, value) in object {
            doc.fields.insert(name.clone(), Value::from_json(value));
        }
        Some(doc)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Document(doc)
    }
}

/// Value equality with cross-type rules, applied in order: null identity,
/// single-field document unwrap, rid/string coercion, composite-key
/// coercion, numeric collapse to the less precise width, then structural
/// equality.
pub fn equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => return true,
        (Value::Null, _) | (_, Value::Null) => return false,
        _ => {}
    }

    // A document carrying an identity equals the rid addressing it.
    if let (Value::Document(doc), Value::Rid(rid)) | (Value::Rid(rid), Value::Document(doc)) =
        (left, right)
    {
        if let Some(id) = doc.rid() {
            return id == *rid;
        }
    }

    // A single-field document stands for its only value.
    if let (Value::Document(doc), other) | (other, Value::Document(doc)) = (left, right) {
        if !matches!(other, Value::Document(_)) {
            if let Some(inner) = doc.single_field_value() {
                return equals(inner, other);
            }
        }
    }

    // Rid against string: equal iff the string parses to the same id.
    if let (Value::Rid(rid), Value::String(s)) | (Value::String(s), Value::Rid(rid)) =
        (left, right)
    {
        if let Ok(parsed) = s.parse::<RecordId>() {
            return *rid == parsed;
        }
    }

    if matches!(left, Value::Key(_)) || matches!(right, Value::Key(_)) {
        let lkey = coerce_key(left);
        let rkey = coerce_key(right);
        return lkey.compare(&rkey) == Some(Ordering::Equal);
    }

    if left.is_number() && right.is_number() {
        return numeric_equals(left, right);
    }

    left == right
}

// Compare using the less precise of the two operand widths.
fn numeric_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Long(a), Value::Long(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Double(a), Value::Double(b)) => a == b,
        (Value::Float(_), _) | (_, Value::Float(_)) => {
            left.as_f32() == right.as_f32()
        }
        (Value::Double(_), _) | (_, Value::Double(_)) => {
            left.as_f64() == right.as_f64()
        }
        _ => left.as_i64() == right.as_i64(),
    }
}

fn coerce_key(value: &Value) -> CompositeKey {
    match value {
        Value::Key(key) => key.clone(),
        Value::List(items) => CompositeKey::of(items.iter().cloned()),
        other => CompositeKey::single(other.clone()),
    }
}

/// Three-way comparison; `None` for incomparable pairs (including any
/// null operand and NaN), which predicates treat as "does not match".
pub fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    if left.is_null() || right.is_null() {
        return None;
    }

    if left.is_number() && right.is_number() {
        return numeric_compare(left, right);
    }

    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Rid(a), Value::Rid(b)) => Some(a.cmp(b)),
        (Value::Rid(rid), Value::String(s)) => {
            s.parse::<RecordId>().ok().map(|parsed| rid.cmp(&parsed))
        }
        (Value::String(s), Value::Rid(rid)) => {
            s.parse::<RecordId>().ok().map(|parsed| parsed.cmp(rid))
        }
        (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
        (Value::Key(_), _) | (_, Value::Key(_)) => {
            coerce_key(left).compare(&coerce_key(right))
        }
        _ => None,
    }
}

fn numeric_compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Float(_), _) | (_, Value::Float(_)) => {
            left.as_f32()?.partial_cmp(&right.as_f32()?)
        }
        (Value::Double(_), _) | (_, Value::Double(_)) => {
            left.as_f64()?.partial_cmp(&right.as_f64()?)
        }
        _ => Some(left.as_i64()?.cmp(&right.as_i64()?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_identity() {
        assert!(equals(&Value::Null, &Value::Null));
        assert!(!equals(&Value::Null, &Value::Long(0)));
        assert!(!equals(&Value::String("x".into()), &Value::Null));
    }

    #[test]
    fn test_numeric_widening() {
        assert!(equals(&Value::Int(1), &Value::Double(1.0)));
        assert!(equals(&Value::Long(1), &Value::Int(1)));
        assert!(!equals(&Value::Long(1), &Value::Int(2)));
    }

    #[test]
    fn test_float_precision_collapse() {
        // The less precise operand wins: f32 against f64 compares as f32.
        assert!(equals(&Value::Float(1.1), &Value::Double(1.100_000_1)));
        assert!(equals(&Value::Double(1.100_000_1), &Value::Float(1.1)));
        assert!(!equals(&Value::Double(1.1), &Value::Double(1.100_000_1)));
    }

    #[test]
    fn test_rid_string_coercion() {
        let rid = Value::Rid(RecordId::new(1, 2));
        assert!(equals(&rid, &Value::String("#1:2".into())));
        assert!(!equals(&rid, &Value::String("#1:3".into())));
        // An unparseable string is simply not equal, never an error.
        assert!(!equals(&rid, &Value::String("not-a-rid".into())));
    }

    #[test]
    fn test_document_rid_identity() {
        let rome = Document::new()
            .with_rid(RecordId::new(2, 0))
            .field("name", "Rome");
        assert!(equals(
            &Value::Document(rome.clone()),
            &Value::Rid(RecordId::new(2, 0))
        ));
        assert!(equals(
            &Value::Rid(RecordId::new(2, 0)),
            &Value::Document(rome.clone())
        ));
        assert!(!equals(
            &Value::Document(rome),
            &Value::Rid(RecordId::new(2, 1))
        ));
        // Identity comparison needs an identity on the document side.
        let detached = Document::new().field("name", "Rome");
        assert!(!equals(
            &Value::Document(detached),
            &Value::Rid(RecordId::new(2, 0))
        ));
    }

    #[test]
    fn test_single_field_document_unwrap() {
        let doc = Document::new().field("only", 42i64);
        assert!(equals(&Value::Document(doc.clone()), &Value::Long(42)));
        assert!(equals(&Value::Long(42), &Value::Document(doc)));

        let two = Document::new().field("a", 1i64).field("b", 2i64);
        assert!(!equals(&Value::Document(two), &Value::Long(1)));
    }

    #[test]
    fn test_composite_key_coercion() {
        let key = Value::Key(CompositeKey::of([Value::Long(1), Value::Long(2)]));
        let list = Value::List(vec![Value::Long(1), Value::Long(2)]);
        assert!(equals(&key, &list));
        assert!(equals(&list, &key));
        assert!(!equals(
            &key,
            &Value::List(vec![Value::Long(1), Value::Long(3)])
        ));
    }

    #[test]
    fn test_compare_incomparable() {
        assert_eq!(compare(&Value::Long(1), &Value::Bool(true)), None);
        assert_eq!(compare(&Value::Null, &Value::Long(1)), None);
        assert_eq!(
            compare(&Value::Double(f64::NAN), &Value::Double(1.0)),
            None
        );
    }

    #[test]
    fn test_compare_cross_numeric() {
        assert_eq!(
            compare(&Value::Int(2), &Value::Double(1.5)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            compare(&Value::Long(1), &Value::Int(1)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_from_json() {
        let value = Value::from_json(&serde_json::json!({"a": 1, "b": [true, "x"]}));
        match value {
            Value::Map(map) => {
                assert_eq!(map.get("a"), Some(&Value::Long(1)));
                assert_eq!(
                    map.get("b"),
                    Some(&Value::List(vec![
                        Value::Bool(true),
                        Value::String("x".into())
                    ]))
                );
            }
            other => panic!("expected map, got {other:?}"),
        }
    }
}
