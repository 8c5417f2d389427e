use crate::dd::{Domain, NEXT, PRESENT, Value};
use crate::error::BuildError;
use crate::graph::{GraphConfig, SymbolicGraph};
use crate::model::{ModelType, Operator};
use crate::reachability::{ForwardReachability, ReachabilityConfig};
use crate::test_utils::example_models::{
    choice_mdp, cyclic_counter, dead_guard, interleaved_coins, overflowing_counter, shared_write,
    synchronized_flags, two_initial_locations,
};
use crate::test_utils::init_logger;
use computation_process::Algorithm;

fn value(graph: &SymbolicGraph, name: &str, copy: usize, value: Value) -> biodivine_lib_bdd::Bdd {
    graph
        .variable(name)
        .unwrap()
        .value_bdd(graph.context(), copy, &value)
}

#[test]
fn synchronized_flags_take_one_joint_step() {
    init_logger();
    let model = synchronized_flags();
    let graph = SymbolicGraph::build(&model, &GraphConfig::default()).unwrap();

    assert_eq!(graph.model_type(), ModelType::Dtmc);
    assert_eq!(graph.num_transitions(), 1);
    assert!(!graph.fixed_deadlocks());
    assert!(graph.action_variable().is_none());
    assert!(graph.action_cube().is_empty());
    assert_eq!(graph.state_count(graph.initial_states()), 1.0);
    assert_eq!(graph.state_count(graph.reachable()), 2.0);
    assert_eq!(
        graph.describe_state(graph.initial_states()),
        "A.location=idle, A.x=false, B.location=idle, B.y=false"
    );

    let from_initial = graph.transitions().and(graph.initial_states());
    let target = value(&graph, "A.x", NEXT, Value::Bool(true))
        .and(&value(&graph, "B.y", NEXT, Value::Bool(false)));
    assert!(!from_initial.is_false());
    assert!(from_initial.and_not(&target).is_false());
    assert_eq!(graph.weights().values_on(&from_initial), vec![Value::Int(1)]);

    // Exactly one successor: the step fixes every next-state bit.
    let successors = graph.present_cube().exists(&from_initial);
    let fixed_bits = graph.next_cube().len() as i32;
    let free = i32::from(successors.num_vars()) - fixed_bits;
    assert_eq!(successors.cardinality(), 2f64.powi(free));
}

#[test]
fn dead_guard_is_fixed_with_self_loop() {
    init_logger();
    let model = dead_guard();
    let graph = SymbolicGraph::build(&model, &GraphConfig::default()).unwrap();
    let ctx = graph.context();

    assert!(graph.fixed_deadlocks());
    assert_eq!(graph.num_transitions(), 1);
    assert!(graph.reachable().iff(graph.initial_states()).is_true());

    let self_loop = graph
        .variables()
        .iter()
        .fold(graph.initial_states().clone(), |acc, it| {
            acc.and(&it.eq_copies(ctx, PRESENT, NEXT))
        });
    assert!(graph.transitions().iff(&self_loop).is_true());
    assert_eq!(graph.weights().values_on(&self_loop), vec![Value::Int(1)]);
}

#[test]
fn dead_guard_without_fixing_fails() {
    init_logger();
    let model = dead_guard();
    let config = GraphConfig {
        fix_deadlocks: false,
        ..Default::default()
    };
    let error = SymbolicGraph::build(&model, &config).err().unwrap();
    assert!(error.is_model_error());
    match error {
        BuildError::Deadlock { count, state } => {
            assert_eq!(count, 1.0);
            assert_eq!(state, "A.location=start, A.x=false");
        }
        other => panic!("Unexpected error: {other}"),
    }
}

#[test]
fn discrete_time_rows_are_normalized() {
    init_logger();
    let model = interleaved_coins();
    let graph = SymbolicGraph::build(&model, &GraphConfig::default()).unwrap();
    let ctx = graph.context();
    assert_eq!(graph.state_count(graph.reachable()), 4.0);
    assert_eq!(graph.num_transitions(), 2);

    let row_sums = graph.weights().abstract_sum(ctx, graph.next_cube()).unwrap();
    assert_eq!(row_sums.values_on(graph.reachable()), vec![Value::Int(1)]);

    // Both coins can leave the state unchanged.
    let stay = graph
        .variables()
        .iter()
        .fold(graph.initial_states().clone(), |acc, it| {
            acc.and(&it.eq_copies(ctx, PRESENT, NEXT))
        });
    assert_eq!(graph.weights().values_on(&stay), vec![Value::Real(0.5)]);
}

#[test]
fn expression_options_do_not_change_the_graph() {
    init_logger();
    let model = interleaved_coins();
    let reference = SymbolicGraph::build(&model, &GraphConfig::default()).unwrap();
    for use_expression_cache in [true, false] {
        for use_expression_vector in [true, false] {
            let config = GraphConfig {
                use_expression_cache,
                use_expression_vector,
                ..Default::default()
            };
            let graph = SymbolicGraph::build(&model, &config).unwrap();
            assert_eq!(graph.weights(), reference.weights());
            assert!(graph.reachable().iff(reference.reachable()).is_true());
        }
    }
}

#[test]
fn nondeterministic_choices_are_indexed() {
    init_logger();
    let model = choice_mdp();
    let graph = SymbolicGraph::build(&model, &GraphConfig::default()).unwrap();
    let ctx = graph.context();

    assert_eq!(graph.num_transitions(), 3);
    assert!(!graph.fixed_deadlocks());
    assert_eq!(graph.action_cube().len(), 16);
    assert_eq!(graph.state_count(graph.reachable()), 3.0);

    let action = graph.action_variable().unwrap();
    let from_initial = graph.transitions().and(graph.initial_states());
    for (index, target) in [(0, 1), (1, 2)] {
        let choice = from_initial.and(&action.int_value(ctx, PRESENT, index));
        assert!(!choice.is_false());
        assert!(choice.and_not(&value(&graph, "M.v", NEXT, Value::Int(target))).is_false());
    }
    let silent = from_initial.and(&action.int_value(ctx, PRESENT, 2));
    assert!(silent.is_false());

    // Nondeterministic weights are not normalized.
    assert_eq!(graph.weights().values_on(graph.transitions()), vec![Value::Int(1)]);
}

#[test]
fn action_bits_must_fit_all_transitions() {
    init_logger();
    let model = choice_mdp();
    let config = GraphConfig {
        action_bits: 1,
        ..Default::default()
    };
    let error = SymbolicGraph::build(&model, &config).err().unwrap();
    assert!(matches!(
        error,
        BuildError::ActionBitsInsufficient {
            available: 1,
            required: 2,
            transitions: 3
        }
    ));

    let model = cyclic_counter(ModelType::Mdp, 3);
    let graph = SymbolicGraph::build(&model, &config).unwrap();
    assert_eq!(graph.num_transitions(), 2);
    assert_eq!(graph.action_cube().len(), 1);
}

#[test]
fn reachable_write_conflict_is_rejected() {
    init_logger();
    let model = shared_write(true);
    let error = SymbolicGraph::build(&model, &GraphConfig::default()).err().unwrap();
    match error {
        BuildError::AmbiguousGlobalWrite {
            transition,
            action,
            state,
        } => {
            assert_eq!(transition, 0);
            assert_eq!(action, "a");
            assert!(state.contains("B.armed=true"));
        }
        other => panic!("Unexpected error: {other}"),
    }
}

#[test]
fn unreachable_write_conflict_is_accepted() {
    init_logger();
    let model = shared_write(false);
    let graph = SymbolicGraph::build(&model, &GraphConfig::default()).unwrap();
    // The conflicting unit is never enabled, so every reachable state is a deadlock.
    assert!(graph.fixed_deadlocks());
    assert_eq!(graph.num_transitions(), 2);
    assert_eq!(graph.state_count(graph.reachable()), 1.0);
}

#[test]
fn out_of_range_assignment_is_rejected() {
    init_logger();
    let model = overflowing_counter();
    let error = SymbolicGraph::build(&model, &GraphConfig::default()).err().unwrap();
    match error {
        BuildError::InvalidAssignment {
            transition,
            variable,
            state,
            ..
        } => {
            assert_eq!(transition, 0);
            assert_eq!(variable, "c");
            assert!(state.starts_with("c=2"));
        }
        other => panic!("Unexpected error: {other}"),
    }
}

#[test]
fn full_integer_range_is_rejected() {
    init_logger();
    let mut model = cyclic_counter(ModelType::Dtmc, 3);
    model.global_variables[0].domain = Domain::Int {
        lower: i64::MIN,
        upper: i64::MAX,
    };
    let error = SymbolicGraph::build(&model, &GraphConfig::default()).err().unwrap();
    assert!(error.is_model_error());
    match error {
        BuildError::DomainTooWide { variable, bits } => {
            assert_eq!(variable, "c");
            assert_eq!(bits, 64);
        }
        other => panic!("Unexpected error: {other}"),
    }
}

#[test]
fn reachable_states_are_a_fixpoint() {
    init_logger();
    let model = cyclic_counter(ModelType::Dtmc, 3);
    let graph = SymbolicGraph::build(&model, &GraphConfig::default()).unwrap();
    assert_eq!(graph.state_count(graph.reachable()), 4.0);

    let config = ReachabilityConfig::new(
        graph.context().clone(),
        graph.transitions().clone(),
        graph.permutation().clone(),
    );
    let again = ForwardReachability::run(config, graph.reachable().clone()).unwrap();
    assert!(again.iff(graph.reachable()).is_true());
}

#[test]
fn iteration_limit_cancels_build() {
    init_logger();
    let model = cyclic_counter(ModelType::Dtmc, 3);
    let config = GraphConfig {
        max_iterations: 2,
        ..Default::default()
    };
    let error = SymbolicGraph::build(&model, &config).err().unwrap();
    assert!(matches!(error, BuildError::Cancelled(_)));
    assert!(!error.is_model_error());
}

#[test]
fn initial_states_combine_locations_and_restriction() {
    init_logger();
    let model = two_initial_locations();
    let graph = SymbolicGraph::build(&model, &GraphConfig::default()).unwrap();
    assert_eq!(graph.state_count(graph.initial_states()), 4.0);
    assert!(graph.reachable().iff(graph.initial_states()).is_true());
    assert_eq!(graph.num_transitions(), 3);
    // Continuous-time weights are rates and stay as they are.
    assert_eq!(graph.weights().values_on(graph.transitions()), vec![Value::Int(1)]);
}

#[test]
fn expression_compiler_translates_state_formulas() {
    init_logger();
    let mut model = cyclic_counter(ModelType::Dtmc, 3);
    let graph = SymbolicGraph::build(&model, &GraphConfig::default()).unwrap();

    let c = model.expressions.identifier("c");
    let two = model.expressions.int(2);
    let high = model.expressions.binary(Operator::Ge, c, two);
    let location = model.expressions.identifier("Counter.location");

    let mut compiler = graph.expression_compiler(&model);
    let high = compiler.compile_bdd(high).unwrap();
    assert_eq!(graph.state_count(&high.and(graph.reachable())), 2.0);
    let location = compiler.compile(location).unwrap();
    assert_eq!(location.values_on(graph.reachable()), vec![Value::Enum(0)]);
}

#[cfg(feature = "serde")]
#[test]
fn config_serialization_roundtrip() {
    let config = GraphConfig {
        fix_deadlocks: false,
        action_bits: 4,
        ..Default::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    let restored: GraphConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, restored);
}
