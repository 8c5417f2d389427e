//! The top-level driver: a complete, validated symbolic transition system.
//!
//! [`SymbolicGraph::build`] allocates all diagram variables, translates the composition tree,
//! explores the reachable state space and then produces the published diagrams:
//!
//!  - `transitions`: pairs of reachable present states and next states (plus an action
//!    index for nondeterministic models) connected by an edge;
//!  - `weights`: the probability or rate of every such edge. For DTMCs, every reachable
//!    state with some outgoing weight has outgoing weights summing to one.
//!
//! A graph is either complete and internally validated, or not built at all: every
//! detected problem of the model aborts the construction with a
//! [`BuildError`](crate::error::BuildError).

use crate::dd::{Cube, DdContext, Mtbdd, PRESENT, Permutation, VariableDd};
use crate::expression::{ExpressionOptions, ExpressionToDd};
use crate::model::{Model, ModelType};
use biodivine_lib_bdd::Bdd;

mod build;
mod config;

#[cfg(test)]
mod tests;

pub use config::GraphConfig;

pub struct SymbolicGraph {
    ctx: DdContext,
    model_type: ModelType,
    options: ExpressionOptions,
    initial_states: Bdd,
    present_cube: Cube,
    next_cube: Cube,
    action_cube: Cube,
    permutation: Permutation,
    reachable: Bdd,
    transitions: Bdd,
    weights: Mtbdd,
    /// Global variables first, then the locations and locals in composition order.
    variables: Vec<VariableDd>,
    action_variable: Option<VariableDd>,
    num_transitions: usize,
    fixed_deadlocks: bool,
}

impl SymbolicGraph {
    pub fn context(&self) -> &DdContext {
        &self.ctx
    }

    pub fn model_type(&self) -> ModelType {
        self.model_type
    }

    pub fn initial_states(&self) -> &Bdd {
        &self.initial_states
    }

    pub fn present_cube(&self) -> &Cube {
        &self.present_cube
    }

    pub fn next_cube(&self) -> &Cube {
        &self.next_cube
    }

    /// Variables of the action-choice encoding; empty for deterministic models.
    pub fn action_cube(&self) -> &Cube {
        &self.action_cube
    }

    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    pub fn reachable(&self) -> &Bdd {
        &self.reachable
    }

    /// Edges between reachable states: present, next and action variables.
    pub fn transitions(&self) -> &Bdd {
        &self.transitions
    }

    /// Numeric weight of every edge; zero outside of [`SymbolicGraph::transitions`].
    pub fn weights(&self) -> &Mtbdd {
        &self.weights
    }

    /// Encodings of all state variables. Locals and locations are named `automaton.name`.
    pub fn variables(&self) -> &[VariableDd] {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&VariableDd> {
        self.variables.iter().find(|it| it.name() == name)
    }

    /// The integer variable over [`SymbolicGraph::action_cube`] that identifies the
    /// transition unit of an edge. Only present for nondeterministic models.
    pub fn action_variable(&self) -> Option<&VariableDd> {
        self.action_variable.as_ref()
    }

    /// Number of transition units, including the deadlock self-loop unit.
    pub fn num_transitions(&self) -> usize {
        self.num_transitions
    }

    /// True if some reachable deadlock states received a self-loop.
    pub fn fixed_deadlocks(&self) -> bool {
        self.fixed_deadlocks
    }

    /// Number of states in a set over present-state variables.
    pub fn state_count(&self, set: &Bdd) -> f64 {
        crate::state_count(set, self.permutation.len())
    }

    /// A human-readable witness of `set`, e.g. `x=1, y=true`.
    pub fn describe_state(&self, set: &Bdd) -> String {
        describe_state(&self.variables, set)
    }

    /// An expression compiler over this graph's encodings, so that state formulas of `model`
    /// can be translated into sets of states. `model` must be the model this graph was
    /// built from.
    pub fn expression_compiler<'a>(&'a self, model: &'a Model) -> ExpressionToDd<'a> {
        seeded_compiler(&self.ctx, model, &self.variables, self.options)
    }
}

/// A compiler that sees the model constants and all `variables` under their own names.
fn seeded_compiler<'a>(
    ctx: &'a DdContext,
    model: &'a Model,
    variables: &[VariableDd],
    options: ExpressionOptions,
) -> ExpressionToDd<'a> {
    let mut compiler = ExpressionToDd::new(ctx, &model.expressions, options);
    for (name, value) in &model.constants {
        compiler.register_value(name, *value);
    }
    for variable in variables {
        compiler.register_variable(variable.name(), variable.clone());
    }
    compiler
}

fn describe_state(variables: &[VariableDd], set: &Bdd) -> String {
    let Some(witness) = set.sat_witness() else {
        return "<none>".to_string();
    };
    variables
        .iter()
        .map(|variable| {
            let value = variable.decode(&witness, PRESENT);
            format!("{}={}", variable.name(), variable.domain().format_value(&value))
        })
        .collect::<Vec<_>>()
        .join(", ")
}
