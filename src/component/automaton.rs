use crate::component::{
    AutomatonLayout, ComponentConfig, ComponentParts, TransitionUnit, ValidityObligation,
};
use crate::dd::{Cube, Mtbdd, NEXT, PRESENT, Value, VariableDd};
use crate::error::{BuildError, BuildResult};
use crate::expression::ExpressionToDd;
use crate::model::{Automaton, Edge};
use biodivine_lib_bdd::Bdd;
use log::trace;
use std::collections::BTreeSet;

/// Translate a single automaton into one transition unit per edge with a non-empty guard.
pub(super) fn translate(config: &ComponentConfig, name: &str) -> BuildResult<ComponentParts> {
    let ctx = config.ctx;
    let automaton = config
        .model
        .automaton(name)
        .ok_or_else(|| BuildError::UnknownAutomaton(name.to_string()))?;
    let layout = config.layout.automaton(name)?;
    let mut compiler = config.compiler();
    for (local, variable) in &layout.locals {
        compiler.register_variable(local, variable.clone());
    }

    let mut transitions = Vec::new();
    for (index, edge) in automaton.edges.iter().enumerate() {
        let at_source = location_bdd(config, layout, PRESENT, edge.location);
        let guard = match edge.guard {
            Some(guard) => compiler.compile_bdd(guard)?.and(&at_source),
            None => at_source,
        };
        if guard.is_false() {
            trace!("Edge #{index} of `{name}` pruned (empty guard).");
            continue;
        }
        let unit = translate_edge(config, &mut compiler, automaton, layout, edge, guard)?;
        transitions.push(unit);
    }

    let mut initial_states = automaton
        .initial_locations
        .iter()
        .fold(ctx.mk_false(), |acc, location| {
            acc.or(&location_bdd(config, layout, PRESENT, *location))
        });
    for (_, local) in &layout.locals {
        initial_states = initial_states.and(&local.valid_values(ctx, PRESENT));
    }
    for variable in &automaton.variables {
        if let (Some(value), Some(dd)) = (variable.initial_value, layout.local(&variable.name)) {
            let restriction = compiler.compile_assignment(dd, PRESENT, value)?;
            initial_states = initial_states.and(&restriction);
        }
    }
    if let Some(restriction) = automaton.initial_states {
        initial_states = initial_states.and(&compiler.compile_bdd(restriction)?);
    }

    let variables: Vec<VariableDd> = layout.variables().cloned().collect();
    let present_cube = variables
        .iter()
        .fold(Cube::empty(), |acc, it| acc.union(&it.cube(PRESENT)));
    let next_cube = variables
        .iter()
        .fold(Cube::empty(), |acc, it| acc.union(&it.cube(NEXT)));

    Ok(ComponentParts {
        transitions,
        initial_states,
        present_cube,
        next_cube,
        variables,
    })
}

fn translate_edge(
    config: &ComponentConfig,
    compiler: &mut ExpressionToDd,
    automaton: &Automaton,
    layout: &AutomatonLayout,
    edge: &Edge,
    guard: Bdd,
) -> BuildResult<TransitionUnit> {
    let ctx = config.ctx;

    // Every variable assigned by some destination is written by the whole edge.
    let mut written: Vec<&VariableDd> = vec![&layout.location];
    for destination in &edge.destinations {
        for assignment in &destination.assignments {
            let variable = resolve(config, automaton, layout, &assignment.variable)?;
            if written.iter().all(|it| it.id() != variable.id()) {
                written.push(variable);
            }
        }
    }

    let mut relation = Mtbdd::constant(ctx, Value::Int(0));
    let mut valid_for = Vec::new();
    for destination in &edge.destinations {
        let mut target = location_bdd(config, layout, NEXT, destination.location);
        let mut assigned = BTreeSet::from([layout.location.id()]);
        for assignment in &destination.assignments {
            let variable = resolve(config, automaton, layout, &assignment.variable)?;
            let update = compiler.compile_assignment(variable, NEXT, assignment.value)?;
            target = target.and(&update);
            let in_range = compiler.value_in_range(variable, assignment.value)?;
            valid_for.push(ValidityObligation {
                variable: variable.name().to_string(),
                valid: guard.imp(&in_range),
            });
            assigned.insert(variable.id());
        }
        // Variables written by another destination of this edge keep their value here.
        for variable in written.iter().filter(|it| !assigned.contains(&it.id())) {
            target = target.and(&variable.eq_copies(ctx, PRESENT, NEXT));
        }
        let weight = match destination.probability {
            Some(probability) => compiler.compile(probability)?,
            None => Mtbdd::constant(ctx, Value::Int(1)),
        };
        relation = relation.add(&Mtbdd::indicator(&target).multiply(&weight)?)?;
    }

    Ok(TransitionUnit {
        action: edge.action.clone(),
        transitions: relation.multiply(&Mtbdd::indicator(&guard))?,
        guard,
        writes: written.iter().map(|it| it.id()).collect(),
        invalid: false,
        valid_for,
    })
}

/// Local variables shadow global variables of the same name.
fn resolve<'b>(
    config: &'b ComponentConfig,
    automaton: &Automaton,
    layout: &'b AutomatonLayout,
    name: &str,
) -> BuildResult<&'b VariableDd> {
    layout
        .local(name)
        .or_else(|| config.globals.iter().find(|it| it.name() == name))
        .ok_or_else(|| BuildError::UnknownVariable {
            automaton: automaton.name.clone(),
            variable: name.to_string(),
        })
}

fn location_bdd(
    config: &ComponentConfig,
    layout: &AutomatonLayout,
    copy: usize,
    location: usize,
) -> Bdd {
    layout
        .location
        .value_bdd(config.ctx, copy, &Value::Enum(location as u32))
}
