//! Index error types
//!
//! A lookup error never aborts planning: the planner treats a failing
//! index as "not usable" and falls back to direct evaluation.

use thiserror::Error;

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Index operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("key arity {actual} does not match index arity {expected}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("unsupported key component: {0}")]
    UnsupportedKey(String),
}

impl IndexError {
    /// Arity mismatch between a key and the index definition
    pub fn arity_mismatch(expected: usize, actual: usize) -> Self {
        IndexError::ArityMismatch { expected, actual }
    }

    /// A key component type the index cannot order
    pub fn unsupported_key(component: impl Into<String>) -> Self {
        IndexError::UnsupportedKey(component.into())
    }
}
