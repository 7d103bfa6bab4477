//! Observability
//!
//! Structured JSON logging and planner counters. Observability is
//! read-only: no side effects on planning, no async, no background
//! threads, deterministic output. The planner only emits log lines when
//! the caller opts in through its search context; the library is silent
//! by default.

mod logger;
mod metrics;

pub use logger::{Logger, Severity};
pub use metrics::{MetricsSnapshot, PlannerMetrics};
