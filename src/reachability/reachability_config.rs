use crate::dd::{Cube, DdContext, Permutation};
use biodivine_lib_bdd::Bdd;

/// A "flat" configuration object for reachability over a symbolic transition relation.
#[derive(Clone)]
pub struct ReachabilityConfig {
    pub ctx: DdContext,
    /// Pairs of present and next states connected by a transition.
    ///
    /// # Panics
    ///
    /// The relation may only depend on the variables of `permutation` (and on variables that
    /// are constant for the whole exploration).
    pub relation: Bdd,
    /// Present/next copies of every state variable.
    pub permutation: Permutation,
    /// Cancel the procedure if it exceeds the specified number of iterations (default:
    /// `usize::MAX`).
    pub max_iterations: usize,
    /// Cancel the procedure if the discovered set exceeds the given amount of BDD nodes
    /// (default: `usize::MAX`).
    pub max_symbolic_size: usize,
}

impl ReachabilityConfig {
    pub fn new(ctx: DdContext, relation: Bdd, permutation: Permutation) -> ReachabilityConfig {
        ReachabilityConfig {
            ctx,
            relation,
            permutation,
            max_iterations: usize::MAX,
            max_symbolic_size: usize::MAX,
        }
    }

    pub fn present_cube(&self) -> Cube {
        self.permutation.present_cube()
    }

    pub fn next_cube(&self) -> Cube {
        self.permutation.next_cube()
    }
}
