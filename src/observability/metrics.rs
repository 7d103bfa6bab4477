//! Planner metrics
//!
//! - Counters only, monotonic
//! - Reset only on registry creation
//! - Thread-safe but lock-minimal

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for index usage and planner outcomes
///
/// # Thread Safety
///
/// All counters use atomic operations with Relaxed ordering; eventual
/// consistency is fine for metrics.
#[derive(Debug, Default)]
pub struct PlannerMetrics {
    /// Exact-key index lookups issued
    point_lookups: AtomicU64,
    /// Range index lookups issued (including below/above)
    range_lookups: AtomicU64,
    /// Expression nodes that produced an index-derived result
    nodes_optimized: AtomicU64,
    /// Expression nodes that fell back to direct evaluation
    nodes_fallback: AtomicU64,
    /// Provably empty conjunctions detected
    contradictions: AtomicU64,
}

impl PlannerMetrics {
    /// Create a new registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment point lookups
    pub fn increment_point_lookups(&self) {
        self.point_lookups.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment range lookups
    pub fn increment_range_lookups(&self) {
        self.range_lookups.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment optimized nodes
    pub fn increment_nodes_optimized(&self) {
        self.nodes_optimized.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment fallback nodes
    pub fn increment_nodes_fallback(&self) {
        self.nodes_fallback.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment detected contradictions
    pub fn increment_contradictions(&self) {
        self.contradictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current values as JSON
    pub fn to_json(&self) -> String {
        let s = self.snapshot();
        format!(
            r#"{{"point_lookups":{},"range_lookups":{},"nodes_optimized":{},"nodes_fallback":{},"contradictions":{}}}"#,
            s.point_lookups, s.range_lookups, s.nodes_optimized, s.nodes_fallback, s.contradictions,
        )
    }

    /// Get all counters as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            point_lookups: self.point_lookups.load(Ordering::Relaxed),
            range_lookups: self.range_lookups.load(Ordering::Relaxed),
            nodes_optimized: self.nodes_optimized.load(Ordering::Relaxed),
            nodes_fallback: self.nodes_fallback.load(Ordering::Relaxed),
            contradictions: self.contradictions.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all planner counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub point_lookups: u64,
    pub range_lookups: u64,
    pub nodes_optimized: u64,
    pub nodes_fallback: u64,
    pub contradictions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        let metrics = PlannerMetrics::new();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.point_lookups, 0);
        assert_eq!(snapshot.range_lookups, 0);
        assert_eq!(snapshot.nodes_optimized, 0);
        assert_eq!(snapshot.contradictions, 0);
    }

    #[test]
    fn test_increment_counters() {
        let metrics = PlannerMetrics::new();
        metrics.increment_point_lookups();
        metrics.increment_point_lookups();
        metrics.increment_range_lookups();
        metrics.increment_nodes_optimized();
        metrics.increment_nodes_fallback();
        metrics.increment_contradictions();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.point_lookups, 2);
        assert_eq!(snapshot.range_lookups, 1);
        assert_eq!(snapshot.nodes_optimized, 1);
        assert_eq!(snapshot.nodes_fallback, 1);
        assert_eq!(snapshot.contradictions, 1);
    }

    #[test]
    fn test_to_json() {
        let metrics = PlannerMetrics::new();
        metrics.increment_range_lookups();
        let parsed: serde_json::Value = serde_json::from_str(&metrics.to_json()).unwrap();
        assert_eq!(parsed["range_lookups"], 1);
        assert_eq!(parsed["point_lookups"], 0);
    }
}
