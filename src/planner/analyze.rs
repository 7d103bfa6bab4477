//! Index analysis walk
//!
//! One post-order pass over a compiled expression that decides, per node,
//! whether secondary indexes can replace or narrow the scan. Leaf
//! comparisons resolve the `field <op> literal` pattern (either operand
//! order), conjunctions first try a single composite-range lookup over a
//! multi-column index before falling back to pairwise combination, and
//! disjunctions always combine pairwise. Multi-segment paths are unfolded
//! through link indexes and the resulting id sets folded back outward.
//!
//! Anything the analysis cannot express through an index stays
//! `Evaluate`; that is a normal outcome, never an error.

use std::collections::BTreeSet;

use crate::expr::{EvalContext, Expression};
use crate::index::{Index, IndexError, IndexKind, IndexResult};
use crate::observability::{Logger, PlannerMetrics};
use crate::schema::{Schema, SchemaClass};
use crate::value::{CompositeKey, Document, KeyBound, RecordId, Value};

use super::range::{FieldRange, RangeMerge};
use super::search::{combine_and, combine_or, IdSet, SearchResult};

/// Everything one plan computation needs: the catalog, the class being
/// scanned, and optional observability hooks.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    schema: &'a dyn Schema,
    class_name: &'a str,
    metrics: Option<&'a PlannerMetrics>,
    log: bool,
}

impl<'a> SearchContext<'a> {
    pub fn new(schema: &'a dyn Schema, class_name: &'a str) -> Self {
        Self {
            schema,
            class_name,
            metrics: None,
            log: false,
        }
    }

    /// Counts index usage and planner outcomes into the given registry.
    pub fn with_metrics(mut self, metrics: &'a PlannerMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Emits a TRACE log line per index lookup and contradiction.
    pub fn with_logging(mut self) -> Self {
        self.log = true;
        self
    }
}

/// The index optimizer.
pub struct Planner<'a> {
    ctx: SearchContext<'a>,
}

impl<'a> Planner<'a> {
    pub fn new(ctx: SearchContext<'a>) -> Self {
        Self { ctx }
    }

    /// Computes the search result for a whole expression.
    ///
    /// Results are returned bottom-up per call; nothing is cached on the
    /// expression, so one compiled tree can be planned concurrently.
    pub fn analyze(&self, expr: &Expression) -> SearchResult {
        let Some(class) = self.ctx.schema.class(self.ctx.class_name) else {
            return SearchResult::evaluate();
        };
        self.analyze_node(class, expr)
    }

    fn analyze_node(&self, class: &'a dyn SchemaClass, expr: &Expression) -> SearchResult {
        match expr {
            Expression::Include => SearchResult::all_included(),
            Expression::Exclude => SearchResult::all_excluded(),

            Expression::And(children) => self.analyze_and(class, children),
            Expression::Or(children) => self.analyze_or(class, children),

            Expression::Equals(_, _)
            | Expression::Inferior(_, _)
            | Expression::InferiorEquals(_, _)
            | Expression::Superior(_, _)
            | Expression::SuperiorEquals(_, _)
            | Expression::Between(_, _, _) => {
                let result = match extract_comparison(expr) {
                    Some((path, range)) => self.search_path(class, &path, &range),
                    None => SearchResult::evaluate(),
                };
                self.track(result)
            }

            Expression::NotEquals(left, right) => {
                let result = self.analyze_not_equals(class, left, right);
                self.track(result)
            }

            Expression::In(left, right) => {
                let result = self.analyze_in(class, left, right);
                self.track(result)
            }

            Expression::Contains(left, right) => {
                let result = self.analyze_contains(class, left, right);
                self.track(result)
            }

            Expression::ContainsText {
                left,
                right,
                ignore_case,
            } => {
                let result = self.analyze_contains_text(class, left, right, *ignore_case);
                self.track(result)
            }

            Expression::ContainsValue(left, right) => {
                let result = self.analyze_contains_value(class, left, right);
                self.track(result)
            }

            // Accessors and literals carry no predicate of their own.
            Expression::Literal(_)
            | Expression::Field(_)
            | Expression::Path(_, _)
            | Expression::Collection(_)
            | Expression::Filtered(_) => SearchResult::evaluate(),
        }
    }

    // Conjunction: try one composite-range lookup before analyzing the
    // children at all, so a covered AND chain costs a single index visit.
    fn analyze_and(&self, class: &'a dyn SchemaClass, children: &[Expression]) -> SearchResult {
        if let Some(result) = self.try_composite(class, children) {
            return self.track(result);
        }

        let mut results = children.iter().map(|c| self.analyze_node(class, c));
        let Some(mut acc) = results.next() else {
            return SearchResult::evaluate();
        };
        for next in results {
            acc = combine_and(&acc, &next);
        }
        self.track(acc)
    }

    fn analyze_or(&self, class: &'a dyn SchemaClass, children: &[Expression]) -> SearchResult {
        let mut results = children.iter().map(|c| self.analyze_node(class, c));
        let Some(mut acc) = results.next() else {
            return SearchResult::evaluate();
        };
        for next in results {
            acc = combine_or(&acc, &next);
        }
        self.track(acc)
    }

    // The composite path: every child must normalize to a single-field
    // range. Ranges sharing a field are merged; a contradiction proves the
    // conjunction empty, an incompatible merge drops the field from index
    // consideration. The largest field combination with a covering index
    // wins and is answered with one range lookup; unconsumed constraints
    // demote the result to candidates.
    fn try_composite(
        &self,
        class: &'a dyn SchemaClass,
        children: &[Expression],
    ) -> Option<SearchResult> {
        if children.len() < 2 {
            return None;
        }
        let mut extracted = Vec::with_capacity(children.len());
        for child in children {
            let (path, range) = extract_comparison(child)?;
            if path.len() != 1 {
                return None;
            }
            extracted.push(range);
        }

        let mut merged: Vec<FieldRange> = Vec::new();
        let mut dropped: BTreeSet<String> = BTreeSet::new();
        for range in extracted {
            if dropped.contains(range.field()) {
                continue;
            }
            match merged.iter().position(|r| r.field() == range.field()) {
                None => merged.push(range),
                Some(pos) => match merged[pos].merge(&range) {
                    RangeMerge::Merged(tightened) => merged[pos] = tightened,
                    RangeMerge::Contradiction => {
                        if let Some(metrics) = self.ctx.metrics {
                            metrics.increment_contradictions();
                        }
                        if self.ctx.log {
                            Logger::trace(
                                "PLAN_CONTRADICTION",
                                &[("class", class.name()), ("field", range.field())],
                            );
                        }
                        return Some(SearchResult::all_excluded());
                    }
                    RangeMerge::Incompatible => {
                        merged.remove(pos);
                        dropped.insert(range.field().to_string());
                    }
                },
            }
        }

        let n = merged.len();
        for k in (1..=n).rev() {
            for combo in combinations(n, k) {
                let fields: Vec<&str> = combo.iter().map(|&i| merged[i].field()).collect();
                for index in class.indexes_for(&fields) {
                    let Some(ids) = self.composite_lookup(index, &merged, &combo) else {
                        continue;
                    };
                    let exact = k == n && dropped.is_empty();
                    let result = if exact {
                        SearchResult::included(ids)
                    } else {
                        SearchResult::candidates(ids)
                    };
                    return Some(result);
                }
            }
        }
        None
    }

    // Builds the composite bounds for one index and field combination.
    // All combination fields except the one on the index's last consumed
    // column must be pointal; trailing index columns are padded so the
    // range edge inclusivity survives the padding.
    fn composite_lookup(
        &self,
        index: &dyn Index,
        ranges: &[FieldRange],
        combo: &[usize],
    ) -> Option<BTreeSet<RecordId>> {
        let k = combo.len();
        // An external catalog may hand back an index that cannot actually
        // cover the combination; skip it rather than slicing past its
        // declared columns.
        if index.fields().len() < k || !is_equality_kind(index.kind()) {
            return None;
        }
        let mut ordered: Vec<&FieldRange> = Vec::with_capacity(k);
        for column in &index.fields()[..k] {
            let range = combo
                .iter()
                .map(|&i| &ranges[i])
                .find(|r| r.field() == column.as_str())?;
            ordered.push(range);
        }
        if ordered[..k - 1].iter().any(|r| !r.is_pointal()) {
            return None;
        }

        let last = ordered[k - 1];
        let arity = index.key_arity();
        let mut min_cols = Vec::with_capacity(arity);
        let mut max_cols = Vec::with_capacity(arity);
        for range in &ordered {
            min_cols.push(range.min().clone());
            max_cols.push(range.max().clone());
        }
        let (min_inclusive, max_inclusive) = if arity > k {
            for _ in k..arity {
                min_cols.push(if last.min_inclusive() {
                    KeyBound::Lowest
                } else {
                    KeyBound::Highest
                });
                max_cols.push(if last.max_inclusive() {
                    KeyBound::Highest
                } else {
                    KeyBound::Lowest
                });
            }
            (true, true)
        } else {
            (last.min_inclusive(), last.max_inclusive())
        };

        self.log_lookup(index);
        if let Some(metrics) = self.ctx.metrics {
            metrics.increment_range_lookups();
        }
        index
            .range_lookup(
                &CompositeKey::new(min_cols),
                &CompositeKey::new(max_cols),
                min_inclusive,
                max_inclusive,
            )
            .ok()
    }

    // Resolves a field path to an indexed lookup, unfolding multi-segment
    // paths through single-column link indexes and folding the id sets
    // back through each hop in reverse.
    fn search_path(
        &self,
        class: &'a dyn SchemaClass,
        path: &[String],
        range: &FieldRange,
    ) -> SearchResult {
        let Some((terminal, hops)) = path.split_last() else {
            return SearchResult::evaluate();
        };

        let mut hop_indexes: Vec<&'a dyn Index> = Vec::with_capacity(hops.len());
        let mut current = class;
        for property in hops {
            let Some(index) = current
                .indexes_for(&[property.as_str()])
                .into_iter()
                .find(|i| i.key_arity() == 1 && is_equality_kind(i.kind()))
            else {
                return SearchResult::evaluate();
            };
            let Some(linked) = current.linked_class(property) else {
                return SearchResult::evaluate();
            };
            let Some(next) = self.ctx.schema.class(linked) else {
                return SearchResult::evaluate();
            };
            hop_indexes.push(index);
            current = next;
        }

        let terminal_result = self.search_field(current, terminal, range);
        self.fold_hops(&hop_indexes, terminal_result)
    }

    fn search_field(
        &self,
        class: &'a dyn SchemaClass,
        field: &str,
        range: &FieldRange,
    ) -> SearchResult {
        for index in class.indexes_for(&[field]) {
            // Fulltext and by-value indexes answer their own predicates
            // only; their entries do not carry equality semantics.
            if !is_equality_kind(index.kind()) {
                continue;
            }
            let lookup = if index.key_arity() == 1 {
                self.single_column_lookup(index, range)
            } else {
                self.first_column_lookup(index, range)
            };
            match lookup {
                Ok(ids) => return SearchResult::included(ids),
                // An unusable index is skipped, never fatal.
                Err(_) => continue,
            }
        }
        SearchResult::evaluate()
    }

    fn single_column_lookup(
        &self,
        index: &dyn Index,
        range: &FieldRange,
    ) -> IndexResult<BTreeSet<RecordId>> {
        self.log_lookup(index);
        if range.is_pointal() {
            if let Some(value) = range.min().as_value() {
                if let Some(metrics) = self.ctx.metrics {
                    metrics.increment_point_lookups();
                }
                return index.point_lookup(&[value.clone()]);
            }
        }
        if let Some(metrics) = self.ctx.metrics {
            metrics.increment_range_lookups();
        }
        match (range.min(), range.max()) {
            (KeyBound::Lowest, KeyBound::Exact(max)) => {
                index.below(max, range.max_inclusive())
            }
            (KeyBound::Exact(min), KeyBound::Highest) => {
                index.above(min, range.min_inclusive())
            }
            (KeyBound::Exact(min), KeyBound::Exact(max)) => index.range_lookup(
                &CompositeKey::single(min.clone()),
                &CompositeKey::single(max.clone()),
                range.min_inclusive(),
                range.max_inclusive(),
            ),
            _ => Err(IndexError::unsupported_key("unbounded range")),
        }
    }

    // A composite index answers a single-field constraint only through
    // its first column, with the remaining columns padded.
    fn first_column_lookup(
        &self,
        index: &dyn Index,
        range: &FieldRange,
    ) -> IndexResult<BTreeSet<RecordId>> {
        let arity = index.key_arity();
        let mut min_cols = Vec::with_capacity(arity);
        let mut max_cols = Vec::with_capacity(arity);
        min_cols.push(range.min().clone());
        max_cols.push(range.max().clone());
        for _ in 1..arity {
            min_cols.push(if range.min_inclusive() {
                KeyBound::Lowest
            } else {
                KeyBound::Highest
            });
            max_cols.push(if range.max_inclusive() {
                KeyBound::Highest
            } else {
                KeyBound::Lowest
            });
        }
        self.log_lookup(index);
        if let Some(metrics) = self.ctx.metrics {
            metrics.increment_range_lookups();
        }
        index.range_lookup(
            &CompositeKey::new(min_cols),
            &CompositeKey::new(max_cols),
            true,
            true,
        )
    }

    fn analyze_not_equals(
        &self,
        class: &'a dyn SchemaClass,
        left: &Expression,
        right: &Expression,
    ) -> SearchResult {
        let Some((path, value, _)) = extract_field_value(left, right) else {
            return SearchResult::evaluate();
        };
        if path.len() != 1 {
            return SearchResult::evaluate();
        }
        // Only a uniqueness guarantee turns the matched ids into a
        // complete exclusion set.
        for index in class.indexes_for(&[path[0].as_str()]) {
            if index.kind() != IndexKind::Unique || index.key_arity() != 1 {
                continue;
            }
            self.log_lookup(index);
            if let Some(metrics) = self.ctx.metrics {
                metrics.increment_point_lookups();
            }
            if let Ok(ids) = index.point_lookup(&[value.clone()]) {
                return SearchResult::excluded(ids);
            }
        }
        SearchResult::evaluate()
    }

    fn analyze_in(
        &self,
        class: &'a dyn SchemaClass,
        left: &Expression,
        right: &Expression,
    ) -> SearchResult {
        let Some(path) = to_stack_path(left) else {
            return SearchResult::evaluate();
        };
        if path.len() != 1 || !right.is_static() {
            return SearchResult::evaluate();
        }
        let values = match right.static_value() {
            Value::List(items) => items,
            Value::Null => return SearchResult::evaluate(),
            single => vec![single],
        };
        if values.is_empty() || !values.iter().all(is_scalar) {
            return SearchResult::evaluate();
        }
        for index in class.indexes_for(&[path[0].as_str()]) {
            if index.key_arity() != 1 || !is_equality_kind(index.kind()) {
                continue;
            }
            self.log_lookup(index);
            if let Some(metrics) = self.ctx.metrics {
                metrics.increment_point_lookups();
            }
            if let Ok(ids) = index.point_lookup(&values) {
                return SearchResult::included(ids);
            }
        }
        SearchResult::evaluate()
    }

    // Containment entries are indexed per element, so a point lookup is a
    // necessary condition; the match is confirmed by direct evaluation.
    fn analyze_contains(
        &self,
        class: &'a dyn SchemaClass,
        left: &Expression,
        right: &Expression,
    ) -> SearchResult {
        let Expression::Literal(value) = right else {
            return SearchResult::evaluate();
        };
        if !is_scalar(value) {
            return SearchResult::evaluate();
        }
        self.candidate_point_lookup(class, left, value, is_equality_kind)
    }

    fn analyze_contains_text(
        &self,
        class: &'a dyn SchemaClass,
        left: &Expression,
        right: &Expression,
        ignore_case: bool,
    ) -> SearchResult {
        // Fulltext lookups are case-sensitive; a case-folded predicate
        // would miss matches, so it stays on the direct path.
        if ignore_case || !right.is_static() {
            return SearchResult::evaluate();
        }
        let needle = right.static_value();
        if !matches!(needle, Value::String(_)) {
            return SearchResult::evaluate();
        }
        self.candidate_point_lookup(class, left, &needle, |kind| kind == IndexKind::Fulltext)
    }

    fn analyze_contains_value(
        &self,
        class: &'a dyn SchemaClass,
        left: &Expression,
        right: &Expression,
    ) -> SearchResult {
        let Expression::Literal(value) = right else {
            return SearchResult::evaluate();
        };
        if !is_scalar(value) {
            return SearchResult::evaluate();
        }
        self.candidate_point_lookup(class, left, value, |kind| kind == IndexKind::MapByValue)
    }

    fn candidate_point_lookup(
        &self,
        class: &'a dyn SchemaClass,
        left: &Expression,
        value: &Value,
        kind_usable: impl Fn(IndexKind) -> bool,
    ) -> SearchResult {
        let Some(path) = to_stack_path(left) else {
            return SearchResult::evaluate();
        };
        if path.len() != 1 {
            return SearchResult::evaluate();
        }
        for index in class.indexes_for(&[path[0].as_str()]) {
            if index.key_arity() != 1 || !kind_usable(index.kind()) {
                continue;
            }
            self.log_lookup(index);
            if let Some(metrics) = self.ctx.metrics {
                metrics.increment_point_lookups();
            }
            if let Ok(ids) = index.point_lookup(&[value.clone()]) {
                return SearchResult::candidates(ids);
            }
        }
        SearchResult::evaluate()
    }

    fn fold_hops(&self, hops: &[&dyn Index], terminal: SearchResult) -> SearchResult {
        let mut result = terminal;
        for hop in hops.iter().rev() {
            result = match self.fold_once(*hop, &result) {
                Some(folded) => folded,
                None => return SearchResult::evaluate(),
            };
        }
        result
    }

    // Projects one hop's id set onto the owning class by looking the ids
    // up as link values through the hop index.
    fn fold_once(&self, hop: &dyn Index, result: &SearchResult) -> Option<SearchResult> {
        if result.is_evaluate() {
            return None;
        }
        if matches!(result.excluded_set(), Some(IdSet::All)) {
            return Some(SearchResult::all_excluded());
        }
        if matches!(result.included_set(), Some(IdSet::All)) {
            // "Every inner record" does not translate through a link.
            return None;
        }
        if let Some(IdSet::Ids(excluded)) = result.excluded_set() {
            return Some(SearchResult::excluded(self.project(hop, excluded)?));
        }
        let included = match result.included_set() {
            Some(IdSet::Ids(ids)) => self.project(hop, ids)?,
            _ => BTreeSet::new(),
        };
        let candidates = match result.candidate_set() {
            Some(ids) => self.project(hop, ids)?,
            None => BTreeSet::new(),
        };
        Some(SearchResult::included_with_candidates(included, candidates))
    }

    fn project(
        &self,
        hop: &dyn Index,
        ids: &BTreeSet<RecordId>,
    ) -> Option<BTreeSet<RecordId>> {
        let keys: Vec<Value> = ids.iter().map(|id| Value::Rid(*id)).collect();
        self.log_lookup(hop);
        if let Some(metrics) = self.ctx.metrics {
            metrics.increment_point_lookups();
        }
        hop.point_lookup(&keys).ok()
    }

    fn track(&self, result: SearchResult) -> SearchResult {
        if let Some(metrics) = self.ctx.metrics {
            if result.is_evaluate() {
                metrics.increment_nodes_fallback();
            } else {
                metrics.increment_nodes_optimized();
            }
        }
        result
    }

    fn log_lookup(&self, index: &dyn Index) {
        if self.ctx.log {
            Logger::trace(
                "INDEX_LOOKUP",
                &[("index", index.name()), ("kind", index.kind().as_str())],
            );
        }
    }
}

/// Applies a computed search result to a record set.
///
/// Included ids pass without re-evaluation, candidates are confirmed by
/// the interpreter, exclusion-style results scan everything outside the
/// excluded set, and `Evaluate` scans everything. Records without an
/// identity are always evaluated directly.
pub fn filter_records<'r>(
    result: &SearchResult,
    records: &'r [Document],
    expr: &Expression,
    ctx: &EvalContext,
) -> Vec<&'r Document> {
    let matches = |doc: &Document| expr.evaluate(ctx, &Value::Document(doc.clone())).is_true();

    if result.is_evaluate() {
        return records.iter().filter(|d| matches(d)).collect();
    }
    if matches!(result.excluded_set(), Some(IdSet::All)) {
        return Vec::new();
    }
    if let Some(IdSet::Ids(excluded)) = result.excluded_set() {
        return records
            .iter()
            .filter(|d| match d.rid() {
                Some(rid) if excluded.contains(&rid) => false,
                _ => matches(d),
            })
            .collect();
    }
    if matches!(result.included_set(), Some(IdSet::All)) {
        return records.iter().collect();
    }

    let empty = BTreeSet::new();
    let included = match result.included_set() {
        Some(IdSet::Ids(ids)) => ids,
        _ => &empty,
    };
    let candidates = result.candidate_set().unwrap_or(&empty);
    records
        .iter()
        .filter(|d| match d.rid() {
            Some(rid) if included.contains(&rid) => true,
            Some(rid) if candidates.contains(&rid) => matches(d),
            Some(_) => false,
            None => matches(d),
        })
        .collect()
}

// `field(.link)*` as a segment list; anything else is not indexable.
fn to_stack_path(expr: &Expression) -> Option<Vec<String>> {
    match expr {
        Expression::Field(name) => Some(vec![name.clone()]),
        Expression::Path(left, right) => {
            let mut path = to_stack_path(left)?;
            path.extend(to_stack_path(right)?);
            Some(path)
        }
        _ => None,
    }
}

// Index kinds whose entries witness plain value equality. Fulltext and
// by-value indexes answer only their own containment predicates.
fn is_equality_kind(kind: IndexKind) -> bool {
    matches!(kind, IndexKind::Unique | IndexKind::NotUnique)
}

// Orderable scalars are the only values an index can answer exactly.
fn is_scalar(value: &Value) -> bool {
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

// Resolves `path <op> static` in either operand order; the flip flag
// reports that the field sat on the right.
fn extract_field_value(
    left: &Expression,
    right: &Expression,
) -> Option<(Vec<String>, Value, bool)> {
    if let Some(path) = to_stack_path(left) {
        if right.is_static() {
            let value = right.static_value();
            if is_scalar(&value) {
                return Some((path, value, false));
            }
        }
    }
    if let Some(path) = to_stack_path(right) {
        if left.is_static() {
            let value = left.static_value();
            if is_scalar(&value) {
                return Some((path, value, true));
            }
        }
    }
    None
}

// Normalizes a comparison node to a path and a range over its terminal
// field. A flipped operand order mirrors the operator direction.
fn extract_comparison(expr: &Expression) -> Option<(Vec<String>, FieldRange)> {
    let ranged = |path: Vec<String>, range: FieldRange| Some((path, range));
    match expr {
        Expression::Equals(l, r) => {
            let (path, value, _) = extract_field_value(l, r)?;
            let field = path.last()?.clone();
            ranged(path, FieldRange::point(field, value))
        }
        Expression::Inferior(l, r) => {
            let (path, value, flipped) = extract_field_value(l, r)?;
            let field = path.last()?.clone();
            let range = if flipped {
                FieldRange::above(field, value, false)
            } else {
                FieldRange::below(field, value, false)
            };
            ranged(path, range)
        }
        Expression::InferiorEquals(l, r) => {
            let (path, value, flipped) = extract_field_value(l, r)?;
            let field = path.last()?.clone();
            let range = if flipped {
                FieldRange::above(field, value, true)
            } else {
                FieldRange::below(field, value, true)
            };
            ranged(path, range)
        }
        Expression::Superior(l, r) => {
            let (path, value, flipped) = extract_field_value(l, r)?;
            let field = path.last()?.clone();
            let range = if flipped {
                FieldRange::below(field, value, false)
            } else {
                FieldRange::above(field, value, false)
            };
            ranged(path, range)
        }
        Expression::SuperiorEquals(l, r) => {
            let (path, value, flipped) = extract_field_value(l, r)?;
            let field = path.last()?.clone();
            let range = if flipped {
                FieldRange::below(field, value, true)
            } else {
                FieldRange::above(field, value, true)
            };
            ranged(path, range)
        }
        Expression::Between(target, min, max) => {
            let path = to_stack_path(target)?;
            if !min.is_static() || !max.is_static() {
                return None;
            }
            let (lo, hi) = (min.static_value(), max.static_value());
            if !is_scalar(&lo) || !is_scalar(&hi) {
                return None;
            }
            let field = path.last()?.clone();
            ranged(path, FieldRange::between(field, lo, hi))
        }
        _ => None,
    }
}

// k-element index combinations of 0..n, lexicographic.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    fn rec(start: usize, n: usize, k: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for i in start..n {
            current.push(i);
            rec(i + 1, n, k, current, out);
            current.pop();
        }
    }
    let mut out = Vec::new();
    let mut current = Vec::with_capacity(k);
    rec(0, n, k, &mut current, &mut out);
    out
}
