//! The input model: a network of automata over typed variables, composed by a tree of
//! parallel-synchronization and action-renaming operators.
//!
//! Models are plain data. They are usually produced by a parser, but the convenience
//! constructors below make it easy to assemble small networks by hand (see tests).

use crate::dd::{Domain, Value};
use std::collections::{BTreeMap, BTreeSet};

mod expression;
mod operator;

pub use expression::{ExprId, Expression, ExpressionPool};
pub use operator::Operator;

/// Semantic type of the composed system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelType {
    /// Labelled transition system.
    Lts,
    /// Discrete-time Markov chain.
    Dtmc,
    /// Continuous-time Markov chain.
    Ctmc,
    /// Markov decision process.
    Mdp,
    /// Continuous-time Markov decision process.
    Ctmdp,
}

impl ModelType {
    /// Nondeterministic models keep their transitions apart through an action-choice encoding.
    pub fn is_nondeterministic(&self) -> bool {
        matches!(self, ModelType::Lts | ModelType::Mdp | ModelType::Ctmdp)
    }

    /// Outgoing weights of discrete-time models are probabilities.
    pub fn is_discrete_time(&self) -> bool {
        matches!(self, ModelType::Lts | ModelType::Dtmc | ModelType::Mdp)
    }
}

/// A typed program variable.
#[derive(Clone, Debug)]
pub struct Variable {
    pub name: String,
    pub domain: Domain,
    /// Restricts the initial states to this value.
    pub initial_value: Option<ExprId>,
}

#[derive(Clone, Debug)]
pub struct Assignment {
    pub variable: String,
    pub value: ExprId,
}

#[derive(Clone, Debug)]
pub struct Destination {
    /// Index into [`Automaton::locations`].
    pub location: usize,
    /// Probability or rate of this destination; `1` if absent.
    pub probability: Option<ExprId>,
    pub assignments: Vec<Assignment>,
}

#[derive(Clone, Debug)]
pub struct Edge {
    /// Source location (index into [`Automaton::locations`]).
    pub location: usize,
    /// Synchronization label; `None` is the silent action which never synchronizes.
    pub action: Option<String>,
    /// `true` if absent.
    pub guard: Option<ExprId>,
    pub destinations: Vec<Destination>,
}

#[derive(Clone, Debug)]
pub struct Automaton {
    pub name: String,
    pub locations: Vec<String>,
    pub initial_locations: Vec<usize>,
    /// Local variables; they shadow global variables of the same name.
    pub variables: Vec<Variable>,
    /// Additional restriction of the initial states of this automaton.
    pub initial_states: Option<ExprId>,
    pub edges: Vec<Edge>,
}

/// A composition tree over automata.
#[derive(Clone, Debug)]
pub enum Composition {
    /// Reference to an [`Automaton`] by name.
    Automaton(String),
    /// Both sides run interleaved, except for actions in `synchronize`, which must be
    /// taken jointly.
    Parallel {
        left: Box<Composition>,
        right: Box<Composition>,
        synchronize: BTreeSet<String>,
    },
    /// Relabel the actions of `inner`. Unmapped actions keep their label.
    Rename {
        inner: Box<Composition>,
        mapping: BTreeMap<String, String>,
    },
}

#[derive(Clone, Debug)]
pub struct Model {
    pub model_type: ModelType,
    pub expressions: ExpressionPool,
    pub constants: Vec<(String, Value)>,
    pub global_variables: Vec<Variable>,
    pub automata: Vec<Automaton>,
    pub system: Composition,
    /// Restriction of the initial states over all variables.
    pub initial_states: Option<ExprId>,
}

impl Variable {
    pub fn new(name: &str, domain: Domain) -> Variable {
        Variable {
            name: name.to_string(),
            domain,
            initial_value: None,
        }
    }

    pub fn with_initial_value(mut self, value: ExprId) -> Variable {
        self.initial_value = Some(value);
        self
    }
}

impl Assignment {
    pub fn new(variable: &str, value: ExprId) -> Assignment {
        Assignment {
            variable: variable.to_string(),
            value,
        }
    }
}

impl Destination {
    pub fn new(
        location: usize,
        probability: Option<ExprId>,
        assignments: Vec<Assignment>,
    ) -> Destination {
        Destination {
            location,
            probability,
            assignments,
        }
    }
}

impl Edge {
    pub fn new(
        location: usize,
        action: Option<&str>,
        guard: Option<ExprId>,
        destinations: Vec<Destination>,
    ) -> Edge {
        Edge {
            location,
            action: action.map(|it| it.to_string()),
            guard,
            destinations,
        }
    }
}

impl Automaton {
    /// An automaton with the given locations, starting in the first one.
    pub fn new(name: &str, locations: &[&str]) -> Automaton {
        Automaton {
            name: name.to_string(),
            locations: locations.iter().map(|it| it.to_string()).collect(),
            initial_locations: vec![0],
            variables: Vec::new(),
            initial_states: None,
            edges: Vec::new(),
        }
    }

    pub fn location_domain(&self) -> Domain {
        Domain::Enum(self.locations.clone())
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|it| it.name == name)
    }
}

impl Composition {
    pub fn automaton(name: &str) -> Composition {
        Composition::Automaton(name.to_string())
    }

    pub fn parallel(left: Composition, right: Composition, synchronize: &[&str]) -> Composition {
        Composition::Parallel {
            left: Box::new(left),
            right: Box::new(right),
            synchronize: synchronize.iter().map(|it| it.to_string()).collect(),
        }
    }

    pub fn rename(inner: Composition, mapping: &[(&str, &str)]) -> Composition {
        Composition::Rename {
            inner: Box::new(inner),
            mapping: mapping
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        }
    }

    /// Names of the referenced automata, from left to right.
    pub fn leaves(&self) -> Vec<&str> {
        match self {
            Composition::Automaton(name) => vec![name.as_str()],
            Composition::Parallel { left, right, .. } => {
                let mut result = left.leaves();
                result.extend(right.leaves());
                result
            }
            Composition::Rename { inner, .. } => inner.leaves(),
        }
    }
}

impl Model {
    /// A model without constants, variables or automata; add them through the public fields.
    pub fn new(model_type: ModelType, expressions: ExpressionPool, system: Composition) -> Model {
        Model {
            model_type,
            expressions,
            constants: Vec::new(),
            global_variables: Vec::new(),
            automata: Vec::new(),
            system,
            initial_states: None,
        }
    }

    pub fn automaton(&self, name: &str) -> Option<&Automaton> {
        self.automata.iter().find(|it| it.name == name)
    }

    pub fn global_variable(&self, name: &str) -> Option<&Variable> {
        self.global_variables.iter().find(|it| it.name == name)
    }
}
