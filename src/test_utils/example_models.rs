//! Small hand-written networks used across the test suites.

use crate::dd::Domain;
use crate::model::{
    Assignment, Automaton, Composition, Destination, Edge, ExprId, ExpressionPool, Model, ModelType,
    Operator, Variable,
};

/// An edge from and to the first location with a single destination of weight one.
fn loop_edge(action: Option<&str>, guard: Option<ExprId>, assignments: Vec<Assignment>) -> Edge {
    Edge::new(0, action, guard, vec![Destination::new(0, None, assignments)])
}

/// Automata `A` (local `x`) and `B` (local `y`) synchronize on `a`. Both flags start `false`;
/// `A` sets `x := true`, `B` sets `y := false`.
pub fn synchronized_flags() -> Model {
    let mut pool = ExpressionPool::new();
    let no = pool.bool(false);
    let yes = pool.bool(true);
    let one = pool.int(1);

    let mut a = Automaton::new("A", &["idle"]);
    a.variables.push(Variable::new("x", Domain::Bool).with_initial_value(no));
    a.edges.push(Edge::new(
        0,
        Some("a"),
        Some(yes),
        vec![Destination::new(0, Some(one), vec![Assignment::new("x", yes)])],
    ));

    let mut b = Automaton::new("B", &["idle"]);
    b.variables.push(Variable::new("y", Domain::Bool).with_initial_value(no));
    b.edges.push(Edge::new(
        0,
        Some("a"),
        Some(yes),
        vec![Destination::new(0, Some(one), vec![Assignment::new("y", no)])],
    ));

    let system = Composition::parallel(
        Composition::automaton("A"),
        Composition::automaton("B"),
        &["a"],
    );
    let mut model = Model::new(ModelType::Dtmc, pool, system);
    model.automata = vec![a, b];
    model
}

/// A single automaton with Boolean locals `x` and `y`, both initially `false`. Its only edge
/// either sets `x` or sets `y`, each with probability one half.
pub fn partial_update() -> Model {
    let mut pool = ExpressionPool::new();
    let no = pool.bool(false);
    let yes = pool.bool(true);
    let half = pool.real(0.5);

    let mut a = Automaton::new("A", &["run"]);
    a.variables.push(Variable::new("x", Domain::Bool).with_initial_value(no));
    a.variables.push(Variable::new("y", Domain::Bool).with_initial_value(no));
    a.edges.push(Edge::new(
        0,
        None,
        None,
        vec![
            Destination::new(0, Some(half), vec![Assignment::new("x", yes)]),
            Destination::new(0, Some(half), vec![Assignment::new("y", yes)]),
        ],
    ));

    let mut model = Model::new(ModelType::Dtmc, pool, Composition::automaton("A"));
    model.automata = vec![a];
    model
}

/// A single automaton whose only edge has the guard `false`.
pub fn dead_guard() -> Model {
    let mut pool = ExpressionPool::new();
    let no = pool.bool(false);
    let yes = pool.bool(true);

    let mut a = Automaton::new("A", &["start", "end"]);
    a.variables.push(Variable::new("x", Domain::Bool).with_initial_value(no));
    a.edges.push(Edge::new(
        0,
        None,
        Some(no),
        vec![Destination::new(1, None, vec![Assignment::new("x", yes)])],
    ));

    let mut model = Model::new(ModelType::Dtmc, pool, Composition::automaton("A"));
    model.automata = vec![a];
    model
}

/// Two independent coins `P` and `Q` that are flipped in an interleaved fashion. Every state
/// has two enabled units, each with outgoing weight one.
pub fn interleaved_coins() -> Model {
    let mut pool = ExpressionPool::new();
    let no = pool.bool(false);
    let yes = pool.bool(true);
    let half = pool.real(0.5);

    let coin = |name: &str| {
        let mut coin = Automaton::new(name, &["flip"]);
        coin.variables.push(Variable::new("heads", Domain::Bool).with_initial_value(no));
        coin.edges.push(Edge::new(
            0,
            None,
            None,
            vec![
                Destination::new(0, Some(half), vec![Assignment::new("heads", yes)]),
                Destination::new(0, Some(half), vec![Assignment::new("heads", no)]),
            ],
        ));
        coin
    };

    let system = Composition::parallel(
        Composition::automaton("P"),
        Composition::automaton("Q"),
        &[],
    );
    let mut model = Model::new(ModelType::Dtmc, pool, system);
    model.automata = vec![coin("P"), coin("Q")];
    model
}

/// A global counter `c` in `[0, bound]` that is incremented up to `bound` and then reset.
pub fn cyclic_counter(model_type: ModelType, bound: i64) -> Model {
    let mut pool = ExpressionPool::new();
    let c = pool.identifier("c");
    let zero = pool.int(0);
    let one = pool.int(1);
    let limit = pool.int(bound);
    let below = pool.binary(Operator::Lt, c, limit);
    let at_limit = pool.binary(Operator::Eq, c, limit);
    let increment = pool.binary(Operator::Add, c, one);

    let mut counter = Automaton::new("Counter", &["run"]);
    counter.edges.push(loop_edge(Some("inc"), Some(below), vec![Assignment::new("c", increment)]));
    counter.edges.push(loop_edge(Some("reset"), Some(at_limit), vec![Assignment::new("c", zero)]));

    let mut model = Model::new(model_type, pool, Composition::automaton("Counter"));
    model
        .global_variables
        .push(Variable::new("c", Domain::Int { lower: 0, upper: bound }).with_initial_value(zero));
    model.automata = vec![counter];
    model
}

/// A global counter in `[0, 2]` that is incremented unconditionally, so the third step
/// leaves its domain.
pub fn overflowing_counter() -> Model {
    let mut pool = ExpressionPool::new();
    let c = pool.identifier("c");
    let zero = pool.int(0);
    let one = pool.int(1);
    let increment = pool.binary(Operator::Add, c, one);

    let mut counter = Automaton::new("Up", &["run"]);
    counter.edges.push(loop_edge(None, None, vec![Assignment::new("c", increment)]));

    let mut model = Model::new(ModelType::Dtmc, pool, Composition::automaton("Up"));
    model
        .global_variables
        .push(Variable::new("c", Domain::Int { lower: 0, upper: 2 }).with_initial_value(zero));
    model.automata = vec![counter];
    model
}

/// An MDP with a single choice between `left` (`v := 1`) and `right` (`v := 2`) in the
/// initial state, followed by silent self-loops.
pub fn choice_mdp() -> Model {
    let mut pool = ExpressionPool::new();
    let v = pool.identifier("v");
    let zero = pool.int(0);
    let one = pool.int(1);
    let two = pool.int(2);
    let start = pool.binary(Operator::Eq, v, zero);
    let done = pool.binary(Operator::Gt, v, zero);

    let mut m = Automaton::new("M", &["s"]);
    m.variables
        .push(Variable::new("v", Domain::Int { lower: 0, upper: 2 }).with_initial_value(zero));
    m.edges.push(loop_edge(Some("left"), Some(start), vec![Assignment::new("v", one)]));
    m.edges.push(loop_edge(Some("right"), Some(start), vec![Assignment::new("v", two)]));
    m.edges.push(loop_edge(None, Some(done), vec![]));

    let mut model = Model::new(ModelType::Mdp, pool, Composition::automaton("M"));
    model.automata = vec![m];
    model
}

/// `A` and `B` synchronize on `a` and both write the global `g`. `B` only takes part when
/// its local flag `armed` is set, which initially equals `armed`.
pub fn shared_write(armed: bool) -> Model {
    let mut pool = ExpressionPool::new();
    let armed_value = pool.bool(armed);
    let armed_flag = pool.identifier("armed");
    let zero = pool.int(0);
    let one = pool.int(1);

    let mut a = Automaton::new("A", &["a0"]);
    a.edges.push(loop_edge(Some("a"), None, vec![Assignment::new("g", one)]));

    let mut b = Automaton::new("B", &["b0"]);
    b.variables
        .push(Variable::new("armed", Domain::Bool).with_initial_value(armed_value));
    b.edges.push(loop_edge(Some("a"), Some(armed_flag), vec![Assignment::new("g", zero)]));

    let system = Composition::parallel(
        Composition::automaton("A"),
        Composition::automaton("B"),
        &["a"],
    );
    let mut model = Model::new(ModelType::Mdp, pool, system);
    model
        .global_variables
        .push(Variable::new("g", Domain::Int { lower: 0, upper: 1 }).with_initial_value(zero));
    model.automata = vec![a, b];
    model
}

/// Automata `A`, `B` and `C`, each toggling its own flag on the action `a`, composed by
/// `system`.
pub fn three_toggles(system: Composition) -> Model {
    let mut pool = ExpressionPool::new();
    let no = pool.bool(false);

    let toggle = |pool: &mut ExpressionPool, name: &str| {
        let flag = pool.identifier("flag");
        let negated = pool.not(flag);
        let mut automaton = Automaton::new(name, &["on"]);
        automaton
            .variables
            .push(Variable::new("flag", Domain::Bool).with_initial_value(no));
        automaton
            .edges
            .push(loop_edge(Some("a"), None, vec![Assignment::new("flag", negated)]));
        automaton
    };

    let automata = vec![
        toggle(&mut pool, "A"),
        toggle(&mut pool, "B"),
        toggle(&mut pool, "C"),
    ];
    let mut model = Model::new(ModelType::Mdp, pool, system);
    model.automata = automata;
    model
}

/// An automaton that starts in either of its first two locations and never moves, with a
/// global `n` in `[0, 3]` restricted to `n < 2` initially.
pub fn two_initial_locations() -> Model {
    let mut pool = ExpressionPool::new();
    let n = pool.identifier("n");
    let two = pool.int(2);
    let small = pool.binary(Operator::Lt, n, two);

    let mut a = Automaton::new("A", &["p", "q", "r"]);
    a.initial_locations = vec![0, 1];
    for location in 0..3 {
        a.edges
            .push(Edge::new(location, None, None, vec![Destination::new(location, None, vec![])]));
    }

    let mut model = Model::new(ModelType::Ctmc, pool, Composition::automaton("A"));
    model
        .global_variables
        .push(Variable::new("n", Domain::Int { lower: 0, upper: 3 }));
    model.automata = vec![a];
    model.initial_states = Some(small);
    model
}
