//! Predicate planner
//!
//! Decides, per sub-expression of a compiled filter, whether secondary
//! indexes can answer it, and composes sibling results soundly:
//!
//! - [`SearchResult`] and the AND/OR combination algebra ([`combine_and`],
//!   [`combine_or`]) with the `All` sentinels
//! - [`FieldRange`] bound normalization and merging for conjunctions
//! - [`Planner`] driving the post-order analysis over a [`SearchContext`]
//! - [`filter_records`], applying a result to a record set with the
//!   interpreter confirming candidates
//!
//! The planner never fails: anything it cannot optimize is left for the
//! direct interpreter.

mod analyze;
mod range;
mod search;

pub use analyze::{filter_records, Planner, SearchContext};
pub use range::{FieldRange, RangeMerge};
pub use search::{combine_and, combine_or, IdSet, SearchResult, SearchState};
