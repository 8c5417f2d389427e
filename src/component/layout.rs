use crate::dd::{DdContextBuilder, VariableDd};
use crate::error::{BuildError, BuildResult};
use crate::model::Model;
use log::trace;
use std::collections::BTreeMap;

/// Diagram variables owned by one automaton instance.
#[derive(Clone, Debug)]
pub struct AutomatonLayout {
    /// The current location, encoded as an enumeration of location names.
    pub location: VariableDd,
    /// Local variables, keyed by their name within the automaton.
    pub locals: Vec<(String, VariableDd)>,
}

/// The allocation of location and local variables of every automaton in a composition.
///
/// Because the diagram variable set is fixed once the context is built, the layout has
/// to be computed before any component is translated. Automata are visited from left
/// to right, so automata that are close in the composition tree are also close in the
/// variable order.
#[derive(Clone, Debug, Default)]
pub struct ComponentLayout {
    automata: BTreeMap<String, AutomatonLayout>,
}

impl AutomatonLayout {
    pub fn local(&self, name: &str) -> Option<&VariableDd> {
        self.locals
            .iter()
            .find(|(local, _)| local == name)
            .map(|(_, variable)| variable)
    }

    /// The location variable followed by all locals.
    pub fn variables(&self) -> impl Iterator<Item = &VariableDd> {
        std::iter::once(&self.location).chain(self.locals.iter().map(|(_, variable)| variable))
    }
}

impl ComponentLayout {
    /// Allocate present/next copies for every automaton referenced by `model.system`.
    pub fn allocate(builder: &mut DdContextBuilder, model: &Model) -> BuildResult<ComponentLayout> {
        let mut automata = BTreeMap::new();
        for name in model.system.leaves() {
            if automata.contains_key(name) {
                return Err(BuildError::DuplicateAutomaton(name.to_string()));
            }
            let automaton = model
                .automaton(name)
                .ok_or_else(|| BuildError::UnknownAutomaton(name.to_string()))?;
            let location =
                builder.make_variable(&format!("{name}.location"), automaton.location_domain(), 2);
            let mut locals = Vec::with_capacity(automaton.variables.len());
            for variable in &automaton.variables {
                let qualified = format!("{name}.{}", variable.name);
                variable.domain.check_width(&qualified)?;
                let dd = builder.make_variable(&qualified, variable.domain.clone(), 2);
                locals.push((variable.name.clone(), dd));
            }
            trace!(
                "Allocated automaton `{name}` with {} location(s) and {} local variable(s).",
                automaton.locations.len(),
                locals.len()
            );
            automata.insert(name.to_string(), AutomatonLayout { location, locals });
        }
        Ok(ComponentLayout { automata })
    }

    pub fn automaton(&self, name: &str) -> BuildResult<&AutomatonLayout> {
        self.automata
            .get(name)
            .ok_or_else(|| BuildError::UnknownAutomaton(name.to_string()))
    }

    /// All allocated variables, ordered by automaton name.
    pub fn variables(&self) -> impl Iterator<Item = &VariableDd> {
        self.automata.values().flat_map(|it| it.variables())
    }
}
