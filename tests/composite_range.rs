//! Composite Range Tests
//!
//! Conjunction planning over multi-column indexes:
//! - One composite range lookup replaces per-field scans
//! - Bound construction carries per-edge inclusivity
//! - Contradictions short-circuit without touching an index
//! - Uncovered constraints leave candidates for the scan

use std::collections::BTreeSet;

use ospreydb::expr::{EvalContext, Expression};
use ospreydb::index::{Index, IndexKind, MemoryIndex};
use ospreydb::observability::PlannerMetrics;
use ospreydb::planner::{filter_records, Planner, SearchContext, SearchState};
use ospreydb::schema::{MemoryClass, MemorySchema, Schema, SchemaClass};
use ospreydb::value::{Document, RecordId};

// =============================================================================
// Helper Functions
// =============================================================================

fn rid(position: i64) -> RecordId {
    RecordId::new(1, position)
}

fn record(position: i64, a: i64, b: i64) -> Document {
    Document::new()
        .with_rid(rid(position))
        .field("a", a)
        .field("b", b)
}

fn records() -> Vec<Document> {
    vec![
        record(0, 5, 10),
        record(1, 5, 15),
        record(2, 5, 7),
        record(3, 6, 50),
        record(4, 4, 99),
    ]
}

fn schema_ab_composite(records: &[Document]) -> MemorySchema {
    let mut schema = MemorySchema::new();
    let mut class = MemoryClass::new("Point");
    class.add_index("ab_idx", ["a", "b"], IndexKind::NotUnique);
    let class = schema.add_class(class);
    for doc in records {
        class.index_document(doc);
    }
    schema
}

fn matched(
    schema: &MemorySchema,
    metrics: &PlannerMetrics,
    expr: &Expression,
    records: &[Document],
) -> BTreeSet<RecordId> {
    let ctx = SearchContext::new(schema, "Point").with_metrics(metrics);
    let result = Planner::new(ctx).analyze(expr);
    filter_records(&result, records, expr, &EvalContext::new())
        .into_iter()
        .filter_map(Document::rid)
        .collect()
}

// =============================================================================
// Composite Lookup Tests
// =============================================================================

/// a = 5 AND b > 10 is answered by exactly one composite range lookup,
/// never two single-column scans.
#[test]
fn test_single_composite_range_lookup() {
    let records = records();
    let schema = schema_ab_composite(&records);
    let metrics = PlannerMetrics::new();

    let expr = Expression::and([
        Expression::equals(Expression::field("a"), Expression::literal(5i64)),
        Expression::superior(Expression::field("b"), Expression::literal(10i64)),
    ]);

    assert_eq!(
        matched(&schema, &metrics, &expr, &records),
        BTreeSet::from([rid(1)])
    );
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.range_lookups, 1);
    assert_eq!(snapshot.point_lookups, 0);
    assert_eq!(snapshot.nodes_optimized, 1);
}

/// The exclusive lower edge of the range bound holds: b > 10 must not
/// match b = 10, while b >= 10 must.
#[test]
fn test_composite_bound_inclusivity() {
    let records = records();
    let schema = schema_ab_composite(&records);
    let metrics = PlannerMetrics::new();

    let strict = Expression::and([
        Expression::equals(Expression::field("a"), Expression::literal(5i64)),
        Expression::superior(Expression::field("b"), Expression::literal(10i64)),
    ]);
    assert_eq!(
        matched(&schema, &metrics, &strict, &records),
        BTreeSet::from([rid(1)])
    );

    let closed = Expression::and([
        Expression::equals(Expression::field("a"), Expression::literal(5i64)),
        Expression::superior_equals(Expression::field("b"), Expression::literal(10i64)),
    ]);
    assert_eq!(
        matched(&schema, &metrics, &closed, &records),
        BTreeSet::from([rid(0), rid(1)])
    );
}

/// All-equality conjunctions collapse to a pointal composite range.
#[test]
fn test_composite_all_pointal() {
    let records = records();
    let schema = schema_ab_composite(&records);
    let metrics = PlannerMetrics::new();

    let expr = Expression::and([
        Expression::equals(Expression::field("a"), Expression::literal(5i64)),
        Expression::equals(Expression::field("b"), Expression::literal(7i64)),
    ]);
    assert_eq!(
        matched(&schema, &metrics, &expr, &records),
        BTreeSet::from([rid(2)])
    );
    assert_eq!(metrics.snapshot().range_lookups, 1);
}

/// Constraints on the same field merge before the lookup.
#[test]
fn test_same_field_ranges_merge() {
    let records = records();
    let schema = schema_ab_composite(&records);
    let metrics = PlannerMetrics::new();

    // a = 5 AND b > 7 AND b < 15 keeps only b = 10.
    let expr = Expression::and([
        Expression::equals(Expression::field("a"), Expression::literal(5i64)),
        Expression::superior(Expression::field("b"), Expression::literal(7i64)),
        Expression::inferior(Expression::field("b"), Expression::literal(15i64)),
    ]);
    assert_eq!(
        matched(&schema, &metrics, &expr, &records),
        BTreeSet::from([rid(0)])
    );
    assert_eq!(metrics.snapshot().range_lookups, 1);
}

// =============================================================================
// Contradiction Tests
// =============================================================================

/// Disjoint equality constraints on one field prove the conjunction
/// empty without any index lookup.
#[test]
fn test_contradiction_short_circuits() {
    let records = records();
    let schema = schema_ab_composite(&records);
    let metrics = PlannerMetrics::new();

    let expr = Expression::and([
        Expression::equals(Expression::field("a"), Expression::literal(1i64)),
        Expression::equals(Expression::field("a"), Expression::literal(2i64)),
    ]);

    assert!(matched(&schema, &metrics, &expr, &records).is_empty());
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.contradictions, 1);
    assert_eq!(snapshot.range_lookups, 0);
    assert_eq!(snapshot.point_lookups, 0);
}

/// Touching open edges on one field are just as impossible.
#[test]
fn test_touching_open_edges_contradict() {
    let records = records();
    let schema = schema_ab_composite(&records);
    let metrics = PlannerMetrics::new();

    let expr = Expression::and([
        Expression::superior(Expression::field("b"), Expression::literal(10i64)),
        Expression::inferior_equals(Expression::field("b"), Expression::literal(10i64)),
    ]);
    assert!(matched(&schema, &metrics, &expr, &records).is_empty());
    assert_eq!(metrics.snapshot().contradictions, 1);
}

// =============================================================================
// Partial Coverage Tests
// =============================================================================

/// With only the leading column constrained, the trailing column is
/// padded open and the lookup still runs once.
#[test]
fn test_leading_column_only() {
    let records = records();
    let schema = schema_ab_composite(&records);
    let metrics = PlannerMetrics::new();

    let expr = Expression::equals(Expression::field("a"), Expression::literal(5i64));
    assert_eq!(
        matched(&schema, &metrics, &expr, &records),
        BTreeSet::from([rid(0), rid(1), rid(2)])
    );
    assert_eq!(metrics.snapshot().range_lookups, 1);
}

/// A trailing-column constraint alone cannot use the composite index.
#[test]
fn test_trailing_column_alone_falls_back() {
    let records = records();
    let schema = schema_ab_composite(&records);

    let expr = Expression::superior(Expression::field("b"), Expression::literal(10i64));
    let planner = Planner::new(SearchContext::new(&schema, "Point"));
    assert_eq!(planner.analyze(&expr).state(), SearchState::Evaluate);

    let metrics = PlannerMetrics::new();
    assert_eq!(
        matched(&schema, &metrics, &expr, &records),
        BTreeSet::from([rid(1), rid(3), rid(4)])
    );
}

// A catalog that answers every index query with its one single-column
// index, whatever field set was asked for.
struct OverclaimingClass {
    index: MemoryIndex,
}

impl SchemaClass for OverclaimingClass {
    fn name(&self) -> &str {
        "Point"
    }

    fn indexes_for(&self, _fields: &[&str]) -> Vec<&dyn Index> {
        vec![&self.index]
    }

    fn linked_class(&self, _property: &str) -> Option<&str> {
        None
    }
}

struct OverclaimingCatalog {
    class: OverclaimingClass,
}

impl Schema for OverclaimingCatalog {
    fn class(&self, name: &str) -> Option<&dyn SchemaClass> {
        (name == "Point").then_some(&self.class as &dyn SchemaClass)
    }
}

/// A catalog handing back an index with fewer columns than the queried
/// combination is skipped, never fatal.
#[test]
fn test_undersized_catalog_index_is_skipped() {
    let records = records();
    let mut index = MemoryIndex::single("a_idx", "a", IndexKind::NotUnique);
    for doc in &records {
        if let (Some(rid), Some(a)) = (doc.rid(), doc.get("a")) {
            index.insert(vec![a.clone()], rid).unwrap();
        }
    }
    let schema = OverclaimingCatalog {
        class: OverclaimingClass { index },
    };

    let expr = Expression::and([
        Expression::equals(Expression::field("a"), Expression::literal(5i64)),
        Expression::superior(Expression::field("b"), Expression::literal(10i64)),
    ]);

    let result = Planner::new(SearchContext::new(&schema, "Point")).analyze(&expr);
    assert_eq!(result.state(), SearchState::Filter);
    assert!(result.candidate_set().is_some());

    let selected: BTreeSet<RecordId> =
        filter_records(&result, &records, &expr, &EvalContext::new())
            .into_iter()
            .filter_map(Document::rid)
            .collect();
    assert_eq!(selected, BTreeSet::from([rid(1)]));
}

/// A field with no covering index leaves the lookup result as
/// candidates, confirmed by the scan.
#[test]
fn test_uncovered_field_leaves_candidates() {
    let mut schema = MemorySchema::new();
    let mut class = MemoryClass::new("Point");
    class.add_index("a_idx", ["a"], IndexKind::NotUnique);
    let class = schema.add_class(class);
    let records = records();
    for doc in &records {
        class.index_document(doc);
    }

    let expr = Expression::and([
        Expression::equals(Expression::field("a"), Expression::literal(5i64)),
        Expression::superior(Expression::field("b"), Expression::literal(10i64)),
    ]);

    let metrics = PlannerMetrics::new();
    let ctx = SearchContext::new(&schema, "Point").with_metrics(&metrics);
    let result = Planner::new(ctx).analyze(&expr);
    assert_eq!(result.state(), SearchState::Filter);
    assert!(result.candidate_set().is_some());
    assert!(result.included_set().is_none());

    let selected: BTreeSet<RecordId> =
        filter_records(&result, &records, &expr, &EvalContext::new())
            .into_iter()
            .filter_map(Document::rid)
            .collect();
    assert_eq!(selected, BTreeSet::from([rid(1)]));
}
