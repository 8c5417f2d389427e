use crate::component::{ComponentConfig, ComponentLayout, DdComponent, TransitionUnit};
use crate::dd::{
    Cube, DdContext, DdContextBuilder, Domain, Mtbdd, NEXT, PRESENT, Permutation, Value, VariableDd,
    VariableId,
};
use crate::error::{BuildError, BuildResult};
use crate::graph::{GraphConfig, SymbolicGraph, describe_state, seeded_compiler};
use crate::log_set;
use crate::model::Model;
use crate::reachability::{ForwardReachability, ReachabilityConfig};
use biodivine_lib_bdd::{Bdd, BddVariable};
use cancel_this::is_cancelled;
use computation_process::Algorithm;
use log::{debug, info, trace};

impl SymbolicGraph {
    /// Build the symbolic transition system of `model`.
    pub fn build(model: &Model, config: &GraphConfig) -> BuildResult<SymbolicGraph> {
        let nondeterministic = model.model_type.is_nondeterministic();
        let options = config.expression_options();
        info!(
            "Building {:?} model with {} automata and {} global variable(s).",
            model.model_type,
            model.automata.len(),
            model.global_variables.len()
        );

        // The variable set is fixed once built: action bits first, then globals, then
        // the automata in composition order.
        let mut builder = DdContextBuilder::new();
        let action_bits = if nondeterministic {
            builder.make_bits("action", config.action_bits)
        } else {
            Vec::new()
        };
        let action_id = builder.reserve_id();
        let mut globals = Vec::with_capacity(model.global_variables.len());
        for variable in &model.global_variables {
            variable.domain.check_width(&variable.name)?;
            globals.push(builder.make_variable(&variable.name, variable.domain.clone(), 2));
        }
        let layout = ComponentLayout::allocate(&mut builder, model)?;
        let ctx = builder.build();

        let component_config = ComponentConfig {
            ctx: &ctx,
            model,
            layout: &layout,
            globals: &globals,
            options,
        };
        let component = DdComponent::build(&component_config, &model.system)?;
        let component_initial = component.initial_states().clone();
        let mut variables = globals.clone();
        variables.extend(component.variables().iter().cloned());
        let mut units = component.into_parts().transitions;
        for unit in units.iter_mut() {
            is_cancelled!()?;
            unit.force_identity(&ctx, &variables);
        }
        info!(
            "Composition produced {} transition unit(s) over {} variable(s).",
            units.len(),
            variables.len()
        );

        let permutation = Permutation::new(&variables);
        let present_cube = permutation.present_cube();
        let next_cube = permutation.next_cube();
        let initial_states =
            restrict_initial_states(&ctx, model, &globals, &variables, component_initial, config)?;

        let mut relation = ctx.mk_false();
        for unit in &units {
            is_cancelled!()?;
            relation = relation.or(&unit.relation(&ctx)?);
        }
        // Out-of-domain successors are not explored; validation reports their sources.
        let in_domain = variables.iter().fold(ctx.mk_true(), |acc, variable| {
            acc.and(&variable.valid_values(&ctx, NEXT))
        });
        let relation = relation.and(&in_domain);
        let mut reachability = ReachabilityConfig::new(ctx.clone(), relation, permutation.clone());
        reachability.max_iterations = config.max_iterations;
        let reachable = ForwardReachability::run(reachability, initial_states.clone())?;
        info!("Reachable states: {}.", log_set(&reachable, permutation.len()));

        let fixed_deadlocks = fix_deadlocks(&ctx, &mut units, &variables, &reachable, config)?;
        validate(&units, &variables, &reachable)?;

        let (action_variable, action_cube) = if nondeterministic {
            let action = action_variable(action_id, action_bits, units.len())?;
            let cube = Cube::new(action.bits(PRESENT).iter().copied());
            (Some(action), cube)
        } else {
            (None, Cube::empty())
        };

        let mut weights = Mtbdd::constant(&ctx, Value::Int(0));
        for (index, unit) in units.iter().enumerate() {
            is_cancelled!()?;
            let unit_weights = match &action_variable {
                Some(action) => unit
                    .transitions
                    .and_bdd(&action.int_value(&ctx, PRESENT, index as i64)),
                None => unit.transitions.clone(),
            };
            weights = weights.add(&unit_weights)?;
        }
        // Transitions leaving unreachable states are not part of the graph.
        weights = weights.and_bdd(&reachable);

        if !nondeterministic && model.model_type.is_discrete_time() {
            let row_sums = weights.abstract_sum(&ctx, &next_cube)?;
            let zero_rows = reachable.and_not(&row_sums.greater_than_zero(&ctx)?);
            if !zero_rows.is_false() {
                debug!(
                    "{} reachable state(s) have no outgoing weight and stay unnormalized.",
                    crate::state_count(&zero_rows, permutation.len())
                );
            }
            weights = weights.divide_ignore_zero(&row_sums)?;
        }
        let transitions = weights.greater_than_zero(&ctx)?;
        info!(
            "Built {} transition unit(s); edge relation has {} BDD node(s), weights have {}.",
            units.len(),
            transitions.size(),
            weights.size()
        );

        Ok(SymbolicGraph {
            model_type: model.model_type,
            options,
            initial_states,
            present_cube,
            next_cube,
            action_cube,
            permutation,
            reachable,
            transitions,
            weights,
            variables,
            action_variable,
            num_transitions: units.len(),
            fixed_deadlocks,
            ctx,
        })
    }
}

/// Initial states of the component, restricted to the global variable ranges, their initial
/// values and the model-wide initial restriction.
fn restrict_initial_states(
    ctx: &DdContext,
    model: &Model,
    globals: &[VariableDd],
    variables: &[VariableDd],
    component_initial: Bdd,
    config: &GraphConfig,
) -> BuildResult<Bdd> {
    let mut compiler = seeded_compiler(ctx, model, variables, config.expression_options());
    let mut result = component_initial;
    for (variable, dd) in model.global_variables.iter().zip(globals) {
        result = result.and(&dd.valid_values(ctx, PRESENT));
        if let Some(value) = variable.initial_value {
            result = result.and(&compiler.compile_assignment(dd, PRESENT, value)?);
        }
    }
    if let Some(restriction) = model.initial_states {
        result = result.and(&compiler.compile_bdd(restriction)?);
    }
    Ok(result)
}

/// Add a self-loop unit on all reachable states without an enabled unit, or fail if
/// `config` does not allow it. Returns true if a unit was added.
fn fix_deadlocks(
    ctx: &DdContext,
    units: &mut Vec<TransitionUnit>,
    variables: &[VariableDd],
    reachable: &Bdd,
    config: &GraphConfig,
) -> BuildResult<bool> {
    let enabled = units
        .iter()
        .fold(ctx.mk_false(), |acc, unit| acc.or(&unit.guard));
    let deadlocks = reachable.and_not(&enabled);
    if deadlocks.is_false() {
        return Ok(false);
    }

    let state_bits = variables.iter().map(|it| it.bits(PRESENT).len()).sum();
    let count = crate::state_count(&deadlocks, state_bits);
    if !config.fix_deadlocks {
        return Err(BuildError::Deadlock {
            count,
            state: describe_state(variables, &deadlocks),
        });
    }

    info!("Adding self-loops to {count} deadlock state(s).");
    let identity = variables.iter().fold(deadlocks.clone(), |acc, variable| {
        acc.and(&variable.eq_copies(ctx, PRESENT, NEXT))
    });
    units.push(TransitionUnit {
        action: None,
        guard: deadlocks,
        transitions: Mtbdd::indicator(&identity),
        writes: variables.iter().map(|it| it.id()).collect(),
        invalid: false,
        valid_for: Vec::new(),
    });
    Ok(true)
}

/// Check that no reachable state enables a unit with conflicting writes or an assignment
/// out of the domain of its variable.
fn validate(
    units: &[TransitionUnit],
    variables: &[VariableDd],
    reachable: &Bdd,
) -> BuildResult<()> {
    for (index, unit) in units.iter().enumerate() {
        is_cancelled!()?;
        if unit.invalid {
            let conflict = unit.guard.and(reachable);
            if !conflict.is_false() {
                return Err(BuildError::AmbiguousGlobalWrite {
                    transition: index,
                    action: unit.label().to_string(),
                    state: describe_state(variables, &conflict),
                });
            }
            debug!(
                "Transition #{index} (`{}`) has conflicting writes, but is never enabled.",
                unit.label()
            );
        }
        for obligation in &unit.valid_for {
            let violation = reachable.and_not(&obligation.valid);
            if !violation.is_false() {
                return Err(BuildError::InvalidAssignment {
                    transition: index,
                    action: unit.label().to_string(),
                    variable: obligation.variable.clone(),
                    state: describe_state(variables, &violation),
                });
            }
        }
        trace!(
            "Transition #{index} (`{}`) validated ({} obligation(s)).",
            unit.label(),
            unit.valid_for.len()
        );
    }
    Ok(())
}

/// The action-choice variable over the reserved bits, able to hold `count` unit indices.
fn action_variable(
    id: VariableId,
    bits: Vec<BddVariable>,
    count: usize,
) -> BuildResult<VariableDd> {
    let domain = Domain::Int {
        lower: 0,
        upper: count.max(1) as i64 - 1,
    };
    let required = domain.num_bits();
    if required > bits.len() {
        return Err(BuildError::ActionBitsInsufficient {
            available: bits.len(),
            required,
            transitions: count,
        });
    }
    debug!("Action encoding uses {required} of {} reserved bit(s).", bits.len());
    Ok(VariableDd::over_bits(id, "action".to_string(), domain, vec![bits]))
}
