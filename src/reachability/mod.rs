//! Symbolic forward exploration of a transition relation.
//!
//! The exploration is expressed as a resumable [`Computation`] (see `computation_process`):
//! the configuration carries the relation and the present/next variable permutation, the
//! state holds the discovered states and the last layer, and each step expands that layer.
//!
//! # Example
//!
//! ```no_run
//! use biodivine_algo_bdd_network::reachability::{ForwardReachability, ReachabilityConfig};
//! # use biodivine_algo_bdd_network::dd::{DdContext, Permutation};
//! # use biodivine_lib_bdd::Bdd;
//! use computation_process::Algorithm;
//!
//! # fn example(ctx: DdContext, relation: Bdd, permutation: Permutation, initial: Bdd) {
//! let config = ReachabilityConfig::new(ctx, relation, permutation);
//! let reachable = ForwardReachability::run(config, initial).unwrap();
//! # }
//! ```

use biodivine_lib_bdd::Bdd;
use cancel_this::Cancellable;
use computation_process::Computation;


mod iterative_union;
mod reachability_config;
mod reachability_state;
mod step_operators;

pub use iterative_union::IterativeUnion;
pub use reachability_config::ReachabilityConfig;
pub use reachability_state::ReachabilityState;
pub use step_operators::{ImagePredecessors, ImageSuccessors};

/// A resumable exploration driven by the layer operator `STEP`.
pub type ReachabilityComputation<STEP> =
    Computation<ReachabilityConfig, ReachabilityState, Bdd, STEP>;

/// Forward exploration, adding one layer of successors per iteration.
pub type ForwardReachability = ReachabilityComputation<IterativeUnion<ImageSuccessors>>;

/// Backward exploration, adding one layer of predecessors per iteration.
pub type BackwardReachability = ReachabilityComputation<IterativeUnion<ImagePredecessors>>;

/// A single step of a reachability procedure, iterated by [`IterativeUnion`].
pub trait ReachabilityStep {
    /// Returns the one-step image of `layer`. The image may overlap states that were
    /// discovered earlier.
    fn step(context: &ReachabilityConfig, layer: &Bdd) -> Cancellable<Bdd>;
}
