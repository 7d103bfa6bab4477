//! ospreydb - predicate evaluation and index planning core
//!
//! An in-process planning library: compiled filter expressions, a direct
//! interpreter, and an index optimizer that turns sub-expressions into
//! point/range lookups and composes the results.

pub mod expr;
pub mod index;
pub mod observability;
pub mod planner;
pub mod schema;
pub mod value;
