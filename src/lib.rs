//! Symbolic construction of weighted transition systems from networks of communicating
//! automata.
//!
//! The crate compiles a [`model::Model`] (automata with guarded, weighted edges over typed
//! variables, composed by parallel synchronization and action renaming) into a single
//! BDD-encoded transition system ([`graph::SymbolicGraph`]) together with its reachable
//! state space.

use biodivine_lib_bdd::Bdd;

#[cfg(test)]
mod test_utils;

pub mod component;
pub mod dd;
pub mod error;
pub mod expression;
pub mod graph;
pub mod model;
pub mod reachability;

/// Number of states in `set`, where `set` depends on at most `state_bits` variables of the
/// context and all other variables are unconstrained.
fn state_count(set: &Bdd, state_bits: usize) -> f64 {
    let free = i32::from(set.num_vars()) - state_bits as i32;
    set.cardinality() / 2f64.powi(free.max(0))
}

/// A utility method for printing useful metadata of symbolic sets.
fn log_set(set: &Bdd, state_bits: usize) -> String {
    format!(
        "elements={}; BDD nodes={}",
        state_count(set, state_bits),
        set.size()
    )
}

/// The last path segment of a type name, used in log messages of generic steps.
fn simple_type_name<T>() -> &'static str {
    std::any::type_name::<T>().split("::").last().unwrap_or("?")
}
