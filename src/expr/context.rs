//! Evaluation context
//!
//! The binding environment passed to every `evaluate` call. It carries
//! named variable bindings only; schema and index metadata belong to the
//! planner's search context, not to direct evaluation.

use std::collections::BTreeMap;

use crate::value::Value;

/// Variable bindings for one evaluation.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    variables: BTreeMap<String, Value>,
}

impl EvalContext {
    /// Creates an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a variable (builder style)
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Variable value by name
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}
