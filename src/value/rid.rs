//! Record identifiers
//!
//! A record id addresses one stored record as `#cluster:position`, the
//! textual form used throughout queries and logs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of a stored record: cluster plus position inside the cluster.
///
/// Ordering is cluster-major, then position, which gives id sets a
/// deterministic iteration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RecordId {
    /// Cluster the record lives in
    pub cluster: i32,
    /// Position within the cluster
    pub position: i64,
}

impl RecordId {
    /// Creates a record id from cluster and position
    pub fn new(cluster: i32, position: i64) -> Self {
        Self { cluster, position }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}", self.cluster, self.position)
    }
}

/// Errors parsing the `#cluster:position` form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RidParseError {
    #[error("record id must start with '#': {0}")]
    MissingPrefix(String),

    #[error("record id must be '#cluster:position': {0}")]
    Malformed(String),
}

impl FromStr for RecordId {
    type Err = RidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix('#')
            .ok_or_else(|| RidParseError::MissingPrefix(s.to_string()))?;
        let (cluster, position) = body
            .split_once(':')
            .ok_or_else(|| RidParseError::Malformed(s.to_string()))?;
        let cluster = cluster
            .parse::<i32>()
            .map_err(|_| RidParseError::Malformed(s.to_string()))?;
        let position = position
            .parse::<i64>()
            .map_err(|_| RidParseError::Malformed(s.to_string()))?;
        Ok(RecordId::new(cluster, position))
    }
}
