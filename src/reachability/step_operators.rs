use crate::log_set;
use crate::reachability::{ReachabilityConfig, ReachabilityStep};
use biodivine_lib_bdd::Bdd;
use cancel_this::{Cancellable, is_cancelled};
use log::trace;

/// Computes the direct successors of a set of present states.
pub struct ImageSuccessors;

/// Computes the direct predecessors of a set of present states.
pub struct ImagePredecessors;

impl ReachabilityStep for ImageSuccessors {
    fn step(context: &ReachabilityConfig, state: &Bdd) -> Cancellable<Bdd> {
        let ctx = &context.ctx;
        is_cancelled!()?;
        let image = context.present_cube().exists(&state.and(&context.relation));
        is_cancelled!()?;
        let post = context.permutation.to_present(ctx, &image);
        trace!(
            "Image successors computed ({}).",
            log_set(&post, context.permutation.len())
        );
        Ok(post)
    }
}

impl ReachabilityStep for ImagePredecessors {
    fn step(context: &ReachabilityConfig, state: &Bdd) -> Cancellable<Bdd> {
        let ctx = &context.ctx;
        is_cancelled!()?;
        let target = context.permutation.to_next(ctx, state);
        is_cancelled!()?;
        let pre = context.next_cube().exists(&target.and(&context.relation));
        trace!(
            "Image predecessors computed ({}).",
            log_set(&pre, context.permutation.len())
        );
        Ok(pre)
    }
}
