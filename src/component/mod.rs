//! Translation of a composition tree into symbolic transition units.
//!
//! Every node of the tree ([`DdComponent`]) yields a list of [`TransitionUnit`] objects. A unit
//! describes the effect of one (possibly synchronized) edge: its guard, its weighted
//! transition relation and the set of variables it writes. Variables outside of the write-set
//! are *not* constrained by the relation; the graph builder fixes them once all variables
//! are known (see [`TransitionUnit::force_identity`]).

use crate::dd::{Cube, DdContext, Mtbdd, NEXT, PRESENT, VariableDd, VariableId};
use crate::error::BuildResult;
use crate::expression::{ExpressionOptions, ExpressionToDd};
use crate::model::{Composition, Model};
use biodivine_lib_bdd::Bdd;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

mod automaton;
mod layout;
mod parallel;
mod rename;


pub use layout::{AutomatonLayout, ComponentLayout};

/// An assignment of a unit must stay within the domain of `variable`. Outside of `valid`,
/// the assigned value can fall out of that domain.
#[derive(Clone, Debug)]
pub struct ValidityObligation {
    pub variable: String,
    /// Present states in which the obligation is satisfied.
    pub valid: Bdd,
}

/// The symbolic effect of one edge, or of a synchronized tuple of edges.
#[derive(Clone, Debug)]
pub struct TransitionUnit {
    /// Synchronization label; `None` is the silent action.
    pub action: Option<String>,
    /// Present states in which the unit is enabled.
    pub guard: Bdd,
    /// Weight of every present/next state pair (zero outside of the relation).
    pub transitions: Mtbdd,
    /// Variables whose next copy is constrained by `transitions`.
    pub writes: BTreeSet<VariableId>,
    /// Set when synchronized units write a common variable. Such a unit is only acceptable
    /// if its guard is unreachable.
    pub invalid: bool,
    pub valid_for: Vec<ValidityObligation>,
}

/// Everything a composition node exposes to its parent.
#[derive(Clone, Debug)]
pub struct ComponentParts {
    pub transitions: Vec<TransitionUnit>,
    pub initial_states: Bdd,
    pub present_cube: Cube,
    pub next_cube: Cube,
    /// Location and local variables of all automata below this node.
    pub variables: Vec<VariableDd>,
}

/// A translated node of the composition tree.
#[derive(Clone, Debug)]
pub enum DdComponent {
    Automaton {
        name: String,
        parts: ComponentParts,
    },
    Parallel {
        synchronize: BTreeSet<String>,
        parts: ComponentParts,
    },
    Rename {
        mapping: BTreeMap<String, String>,
        parts: ComponentParts,
    },
}

/// Shared inputs of the translation of one composition tree.
#[derive(Clone, Copy)]
pub struct ComponentConfig<'a> {
    pub ctx: &'a DdContext,
    pub model: &'a Model,
    pub layout: &'a ComponentLayout,
    /// Encodings of the global variables, visible from every automaton.
    pub globals: &'a [VariableDd],
    pub options: ExpressionOptions,
}

impl TransitionUnit {
    /// The action label used in diagnostics.
    pub fn label(&self) -> &str {
        self.action.as_deref().unwrap_or("τ")
    }

    /// The unweighted relation: pairs of states with a positive weight.
    pub fn relation(&self, ctx: &DdContext) -> BuildResult<Bdd> {
        self.transitions.greater_than_zero(ctx)
    }

    /// Constrain every variable in `variables` that this unit does not write to keep
    /// its value.
    pub fn force_identity<'b, I>(&mut self, ctx: &DdContext, variables: I)
    where
        I: IntoIterator<Item = &'b VariableDd>,
    {
        let frame = variables
            .into_iter()
            .filter(|variable| !self.writes.contains(&variable.id()))
            .fold(ctx.mk_true(), |acc, variable| {
                acc.and(&variable.eq_copies(ctx, PRESENT, NEXT))
            });
        self.transitions = self.transitions.and_bdd(&frame);
    }
}

impl<'a> ComponentConfig<'a> {
    /// A fresh expression compiler that sees the model constants and the global variables.
    pub fn compiler(&self) -> ExpressionToDd<'a> {
        let mut compiler = ExpressionToDd::new(self.ctx, &self.model.expressions, self.options);
        for (name, value) in &self.model.constants {
            compiler.register_value(name, *value);
        }
        for global in self.globals {
            compiler.register_variable(global.name(), global.clone());
        }
        compiler
    }
}

impl DdComponent {
    /// Recursively translate `composition`.
    pub fn build(config: &ComponentConfig, composition: &Composition) -> BuildResult<DdComponent> {
        let component = match composition {
            Composition::Automaton(name) => DdComponent::Automaton {
                name: name.clone(),
                parts: automaton::translate(config, name)?,
            },
            Composition::Parallel {
                left,
                right,
                synchronize,
            } => {
                let left = DdComponent::build(config, left)?.into_parts();
                let right = DdComponent::build(config, right)?.into_parts();
                DdComponent::Parallel {
                    synchronize: synchronize.clone(),
                    parts: parallel::compose(left, right, synchronize)?,
                }
            }
            Composition::Rename { inner, mapping } => {
                let inner = DdComponent::build(config, inner)?.into_parts();
                DdComponent::Rename {
                    mapping: mapping.clone(),
                    parts: rename::rename(inner, mapping),
                }
            }
        };
        debug!(
            "Translated {} component into {} transition unit(s).",
            component.kind(),
            component.parts().transitions.len()
        );
        Ok(component)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DdComponent::Automaton { .. } => "automaton",
            DdComponent::Parallel { .. } => "parallel",
            DdComponent::Rename { .. } => "rename",
        }
    }

    pub fn parts(&self) -> &ComponentParts {
        match self {
            DdComponent::Automaton { parts, .. }
            | DdComponent::Parallel { parts, .. }
            | DdComponent::Rename { parts, .. } => parts,
        }
    }

    pub fn into_parts(self) -> ComponentParts {
        match self {
            DdComponent::Automaton { parts, .. }
            | DdComponent::Parallel { parts, .. }
            | DdComponent::Rename { parts, .. } => parts,
        }
    }

    pub fn transitions(&self) -> &[TransitionUnit] {
        &self.parts().transitions
    }

    pub fn initial_states(&self) -> &Bdd {
        &self.parts().initial_states
    }

    pub fn present_cube(&self) -> &Cube {
        &self.parts().present_cube
    }

    pub fn next_cube(&self) -> &Cube {
        &self.parts().next_cube
    }

    pub fn variables(&self) -> &[VariableDd] {
        &self.parts().variables
    }
}
