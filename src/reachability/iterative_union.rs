use crate::reachability::{ReachabilityConfig, ReachabilityState, ReachabilityStep};
use crate::{log_set, simple_type_name, state_count};
use biodivine_lib_bdd::Bdd;
use cancel_this::Cancelled;
use computation_process::Incomplete::Suspended;
use computation_process::{Completable, ComputationStep};
use log::debug;
use std::marker::PhantomData;

/// Breadth-first exploration: each step expands the last layer through `S` and adds the
/// states that were not discovered before.
///
/// The computation completes once a layer is empty. It is cancelled when it runs for more
/// than [`ReachabilityConfig::max_iterations`] layers, or when the discovered set grows
/// beyond [`ReachabilityConfig::max_symbolic_size`] nodes.
pub struct IterativeUnion<S: ReachabilityStep>(PhantomData<S>);

impl<S: ReachabilityStep> ComputationStep<ReachabilityConfig, ReachabilityState, Bdd>
    for IterativeUnion<S>
{
    fn step(context: &ReachabilityConfig, state: &mut ReachabilityState) -> Completable<Bdd> {
        let state_bits = context.permutation.len();
        if state.iteration >= context.max_iterations {
            debug!(
                "[layer:{}] {} stopped after {} state(s); iteration limit reached.",
                state.iteration,
                simple_type_name::<S>(),
                state_count(&state.set, state_bits)
            );
            return Err(Cancelled::new("ReachabilityConfig::max_iterations").into());
        }
        state.iteration += 1;

        let layer = S::step(context, &state.frontier)?.and_not(&state.set);
        if layer.is_false() {
            debug!(
                "[layer:{}] {} reached a fixpoint ({}).",
                state.iteration,
                simple_type_name::<S>(),
                log_set(&state.set, state_bits)
            );
            return Ok(state.set.clone());
        }

        state.set = state.set.or(&layer);
        if state.set.size() > context.max_symbolic_size {
            debug!(
                "[layer:{}] {} stopped at {} BDD nodes; size limit reached.",
                state.iteration,
                simple_type_name::<S>(),
                state.set.size()
            );
            return Err(Cancelled::new("ReachabilityConfig::max_symbolic_size").into());
        }

        debug!(
            "[layer:{}] {} discovered {} new state(s); total ({}).",
            state.iteration,
            simple_type_name::<S>(),
            state_count(&layer, state_bits),
            log_set(&state.set, state_bits)
        );
        state.frontier = layer;
        Err(Suspended)
    }
}
