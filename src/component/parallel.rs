use crate::component::{ComponentParts, TransitionUnit, ValidityObligation};
use crate::error::BuildResult;
use log::trace;
use std::collections::BTreeSet;

/// Parallel composition of two translated components.
///
/// Units labelled with an action from `synchronize` are paired with every unit of the
/// other side that has the same label; units without such a partner are blocked. All
/// other units (including the silent ones) interleave unchanged.
pub(super) fn compose(
    left: ComponentParts,
    right: ComponentParts,
    synchronize: &BTreeSet<String>,
) -> BuildResult<ComponentParts> {
    let is_synchronized = |unit: &TransitionUnit| {
        unit.action
            .as_ref()
            .is_some_and(|action| synchronize.contains(action))
    };

    let mut transitions = Vec::new();
    for unit in left.transitions.iter().chain(right.transitions.iter()) {
        if !is_synchronized(unit) {
            transitions.push(unit.clone());
        }
    }
    for l in left.transitions.iter().filter(|it| is_synchronized(*it)) {
        for r in right.transitions.iter().filter(|it| it.action == l.action) {
            if let Some(unit) = synchronize_units(l, r)? {
                transitions.push(unit);
            }
        }
    }

    trace!(
        "Parallel composition over {:?} produced {} unit(s).",
        synchronize,
        transitions.len()
    );

    let mut variables = left.variables;
    variables.extend(right.variables);
    Ok(ComponentParts {
        transitions,
        initial_states: left.initial_states.and(&right.initial_states),
        present_cube: left.present_cube.union(&right.present_cube),
        next_cube: left.next_cube.union(&right.next_cube),
        variables,
    })
}

/// The joint execution of two units with the same action, or `None` if they can never
/// be enabled together.
fn synchronize_units(
    left: &TransitionUnit,
    right: &TransitionUnit,
) -> BuildResult<Option<TransitionUnit>> {
    let guard = left.guard.and(&right.guard);
    if guard.is_false() {
        trace!("Synchronization on `{}` pruned (disjoint guards).", left.label());
        return Ok(None);
    }
    let overlap = !left.writes.is_disjoint(&right.writes);
    // Obligations only need to hold where the joint unit is enabled.
    let disabled = guard.not();
    let valid_for = left
        .valid_for
        .iter()
        .chain(right.valid_for.iter())
        .map(|it| ValidityObligation {
            variable: it.variable.clone(),
            valid: it.valid.or(&disabled),
        })
        .collect();
    Ok(Some(TransitionUnit {
        action: left.action.clone(),
        guard,
        transitions: left.transitions.multiply(&right.transitions)?,
        writes: left.writes.union(&right.writes).copied().collect(),
        invalid: left.invalid || right.invalid || overlap,
        valid_for,
    }))
}
