use crate::expression::ExpressionOptions;

/// Options of [`SymbolicGraph::build`](crate::graph::SymbolicGraph::build).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphConfig {
    /// Add a self-loop to every reachable deadlock state instead of failing (default: `true`).
    pub fix_deadlocks: bool,
    /// Number of diagram variables reserved for the action-choice encoding of
    /// nondeterministic models (default: `16`).
    ///
    /// The reserved bits are allocated before all other variables, so the encoding has to fit
    /// into them once the number of transitions is known.
    pub action_bits: usize,
    /// See [`ExpressionOptions::use_cache`] (default: `true`).
    pub use_expression_cache: bool,
    /// See [`ExpressionOptions::use_vector`] (default: `true`).
    pub use_expression_vector: bool,
    /// Cancel the reachability procedure if it exceeds the specified number of iterations
    /// (default: `usize::MAX`).
    pub max_iterations: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        GraphConfig::new()
    }
}

impl From<&GraphConfig> for ExpressionOptions {
    fn from(value: &GraphConfig) -> Self {
        ExpressionOptions {
            use_cache: value.use_expression_cache,
            use_vector: value.use_expression_vector,
        }
    }
}

impl GraphConfig {
    pub fn new() -> GraphConfig {
        GraphConfig {
            fix_deadlocks: true,
            action_bits: 16,
            use_expression_cache: true,
            use_expression_vector: true,
            max_iterations: usize::MAX,
        }
    }

    pub fn expression_options(&self) -> ExpressionOptions {
        ExpressionOptions::from(self)
    }
}
