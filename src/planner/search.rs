//! Search-result algebra
//!
//! The tri-state outcome of index analysis for one expression node, and
//! the pairwise AND/OR combination rules the planner folds child results
//! with. A result is either inclusion-style (`included` ids known to
//! match plus `candidates` needing confirmation) or exclusion-style
//! (`excluded` ids known not to match); the `All` sentinel short-circuits
//! either direction.

use std::collections::BTreeSet;

use crate::value::RecordId;

/// A set of record ids, or the "every record" sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdSet {
    /// Every record in the class
    All,
    /// An explicit id set
    Ids(BTreeSet<RecordId>),
}

impl IdSet {
    pub fn empty() -> Self {
        IdSet::Ids(BTreeSet::new())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, IdSet::All)
    }

    /// Explicit ids; `None` for the sentinel
    pub fn ids(&self) -> Option<&BTreeSet<RecordId>> {
        match self {
            IdSet::All => None,
            IdSet::Ids(ids) => Some(ids),
        }
    }

    fn union(&self, other: &IdSet) -> IdSet {
        match (self, other) {
            (IdSet::All, _) | (_, IdSet::All) => IdSet::All,
            (IdSet::Ids(a), IdSet::Ids(b)) => IdSet::Ids(a.union(b).copied().collect()),
        }
    }

    fn intersect(&self, other: &IdSet) -> IdSet {
        match (self, other) {
            (IdSet::All, x) | (x, IdSet::All) => x.clone(),
            (IdSet::Ids(a), IdSet::Ids(b)) => {
                IdSet::Ids(a.intersection(b).copied().collect())
            }
        }
    }

    fn minus(&self, removed: &BTreeSet<RecordId>) -> IdSet {
        match self {
            IdSet::All => IdSet::All,
            IdSet::Ids(a) => IdSet::Ids(a.difference(removed).copied().collect()),
        }
    }
}

impl From<BTreeSet<RecordId>> for IdSet {
    fn from(ids: BTreeSet<RecordId>) -> Self {
        IdSet::Ids(ids)
    }
}

/// Whether index analysis produced anything usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// No index help; every candidate must be tested directly
    Evaluate,
    /// Index-derived result available
    Filter,
}

/// Outcome of index analysis for one node, one execution.
///
/// Inclusion-style results carry `included` and `candidates`;
/// exclusion-style results carry `excluded`. The two styles never mix.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    state: SearchState,
    included: Option<IdSet>,
    candidates: Option<BTreeSet<RecordId>>,
    excluded: Option<IdSet>,
}

impl SearchResult {
    /// The initial "no index help" result
    pub fn evaluate() -> Self {
        Self {
            state: SearchState::Evaluate,
            included: None,
            candidates: None,
            excluded: None,
        }
    }

    /// Every record matches, no scan needed
    pub fn all_included() -> Self {
        Self {
            state: SearchState::Filter,
            included: Some(IdSet::All),
            candidates: None,
            excluded: None,
        }
    }

    /// No record can match
    pub fn all_excluded() -> Self {
        Self {
            state: SearchState::Filter,
            included: None,
            candidates: None,
            excluded: Some(IdSet::All),
        }
    }

    /// Exactly these ids match
    pub fn included(ids: BTreeSet<RecordId>) -> Self {
        Self {
            state: SearchState::Filter,
            included: Some(IdSet::Ids(ids)),
            candidates: None,
            excluded: None,
        }
    }

    /// These ids pass a necessary condition and need confirmation
    pub fn candidates(ids: BTreeSet<RecordId>) -> Self {
        Self {
            state: SearchState::Filter,
            included: None,
            candidates: Some(ids),
            excluded: None,
        }
    }

    /// Confirmed ids plus ids needing confirmation
    pub fn included_with_candidates(
        included: BTreeSet<RecordId>,
        candidates: BTreeSet<RecordId>,
    ) -> Self {
        Self {
            state: SearchState::Filter,
            included: Some(IdSet::Ids(included)),
            candidates: Some(candidates),
            excluded: None,
        }
    }

    /// Exactly these ids are known not to match
    pub fn excluded(ids: BTreeSet<RecordId>) -> Self {
        Self {
            state: SearchState::Filter,
            included: None,
            candidates: None,
            excluded: Some(IdSet::Ids(ids)),
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn is_evaluate(&self) -> bool {
        self.state == SearchState::Evaluate
    }

    pub fn included_set(&self) -> Option<&IdSet> {
        self.included.as_ref()
    }

    pub fn candidate_set(&self) -> Option<&BTreeSet<RecordId>> {
        self.candidates.as_ref()
    }

    pub fn excluded_set(&self) -> Option<&IdSet> {
        self.excluded.as_ref()
    }

    fn is_exclusion(&self) -> bool {
        self.excluded.is_some()
    }

    fn included_all(&self) -> bool {
        matches!(self.included, Some(IdSet::All))
    }

    fn excluded_all(&self) -> bool {
        matches!(self.excluded, Some(IdSet::All))
    }

    // Explicit included ids, empty when absent or All.
    fn included_ids(&self) -> BTreeSet<RecordId> {
        match &self.included {
            Some(IdSet::Ids(ids)) => ids.clone(),
            _ => BTreeSet::new(),
        }
    }

    fn candidate_ids(&self) -> BTreeSet<RecordId> {
        self.candidates.clone().unwrap_or_default()
    }

    fn excluded_ids(&self) -> BTreeSet<RecordId> {
        match &self.excluded {
            Some(IdSet::Ids(ids)) => ids.clone(),
            _ => BTreeSet::new(),
        }
    }
}

/// Conjunction of two child results.
///
/// Either child still `Evaluate` voids the combination: the parent cannot
/// soundly intersect with an unknown side.
pub fn combine_and(left: &SearchResult, right: &SearchResult) -> SearchResult {
    if left.is_evaluate() || right.is_evaluate() {
        return SearchResult::evaluate();
    }
    if left.excluded_all() || right.excluded_all() {
        return SearchResult::all_excluded();
    }
    if left.included_all() {
        return right.clone();
    }
    if right.included_all() {
        return left.clone();
    }

    match (left.is_exclusion(), right.is_exclusion()) {
        (false, false) => {
            let l_reach: BTreeSet<RecordId> = left
                .included_ids()
                .union(&left.candidate_ids())
                .copied()
                .collect();
            let r_reach: BTreeSet<RecordId> = right
                .included_ids()
                .union(&right.candidate_ids())
                .copied()
                .collect();
            let mut candidates: BTreeSet<RecordId> =
                l_reach.intersection(&r_reach).copied().collect();
            let included: BTreeSet<RecordId> = candidates
                .iter()
                .filter(|id| {
                    left.included_ids().contains(id) && right.included_ids().contains(id)
                })
                .copied()
                .collect();
            candidates.retain(|id| !included.contains(id));
            SearchResult::included_with_candidates(included, candidates)
        }
        (false, true) => subtract_exclusion(left, right),
        (true, false) => subtract_exclusion(right, left),
        (true, true) => {
            let excluded = IdSet::Ids(left.excluded_ids())
                .union(&IdSet::Ids(right.excluded_ids()));
            match excluded {
                IdSet::Ids(ids) => SearchResult::excluded(ids),
                IdSet::All => SearchResult::all_excluded(),
            }
        }
    }
}

fn subtract_exclusion(inclusion: &SearchResult, exclusion: &SearchResult) -> SearchResult {
    let removed = exclusion.excluded_ids();
    let included = match inclusion.included_set() {
        Some(set) => set.minus(&removed),
        None => IdSet::empty(),
    };
    let candidates: BTreeSet<RecordId> = inclusion
        .candidate_ids()
        .difference(&removed)
        .copied()
        .collect();
    match included {
        IdSet::All => SearchResult::all_included(),
        IdSet::Ids(ids) => SearchResult::included_with_candidates(ids, candidates),
    }
}

/// Disjunction of two child results.
///
/// A mixed inclusion/exclusion pair degrades to the union of exclusion
/// sets, dropping the inclusion side's positive information. Kept for
/// compatibility with the reference behavior; see DESIGN.md before
/// tightening it.
pub fn combine_or(left: &SearchResult, right: &SearchResult) -> SearchResult {
    if left.is_evaluate() || right.is_evaluate() {
        return SearchResult::evaluate();
    }
    if left.included_all() || right.included_all() {
        return SearchResult::all_included();
    }
    if left.excluded_all() {
        return right.clone();
    }
    if right.excluded_all() {
        return left.clone();
    }

    match (left.is_exclusion(), right.is_exclusion()) {
        (true, true) => {
            let excluded: BTreeSet<RecordId> = left
                .excluded_ids()
                .intersection(&right.excluded_ids())
                .copied()
                .collect();
            SearchResult::excluded(excluded)
        }
        (false, false) => {
            let included: BTreeSet<RecordId> = left
                .included_ids()
                .union(&right.included_ids())
                .copied()
                .collect();
            let candidates: BTreeSet<RecordId> = left
                .candidate_ids()
                .union(&right.candidate_ids())
                .copied()
                .filter(|id| !included.contains(id))
                .collect();
            SearchResult::included_with_candidates(included, candidates)
        }
        _ => {
            let excluded: BTreeSet<RecordId> = left
                .excluded_ids()
                .union(&right.excluded_ids())
                .copied()
                .collect();
            SearchResult::excluded(excluded)
        }
    }
}
