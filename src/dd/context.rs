use crate::dd::{Domain, VariableDd, VariableId};
use biodivine_lib_bdd::{Bdd, BddVariable, BddVariableSet, BddVariableSetBuilder};
use std::collections::HashSet;
use std::fmt::{Debug, Formatter};

/// The global ordered set of diagram variables shared by every diagram of one graph.
///
/// A [`DdContext`] is immutable. All variables have to be declared up-front through
/// a [`DdContextBuilder`], in the order in which they should appear in the diagrams.
#[derive(Clone)]
pub struct DdContext {
    variables: BddVariableSet,
}

/// Allocates diagram variables before the [`DdContext`] is frozen.
///
/// Typed variables are allocated with their copies interleaved bit by bit
/// (`x_0`, `x_0'`, `x_1`, `x_1'`, ...), which keeps transition relations small.
pub struct DdContextBuilder {
    builder: BddVariableSetBuilder,
    names: HashSet<String>,
    next_id: usize,
}

impl Debug for DdContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DdContext(variables={})", self.variables.num_vars())
    }
}

impl DdContext {
    pub fn mk_true(&self) -> Bdd {
        self.variables.mk_true()
    }

    pub fn mk_false(&self) -> Bdd {
        self.variables.mk_false()
    }

    pub fn mk_var(&self, variable: BddVariable) -> Bdd {
        self.variables.mk_var(variable)
    }

    pub fn mk_literal(&self, variable: BddVariable, value: bool) -> Bdd {
        self.variables.mk_literal(variable, value)
    }

    pub fn mk_constant(&self, value: bool) -> Bdd {
        if value { self.mk_true() } else { self.mk_false() }
    }

    pub fn num_vars(&self) -> u16 {
        self.variables.num_vars()
    }

    pub fn name_of(&self, variable: BddVariable) -> String {
        self.variables.name_of(variable)
    }

    /// The underlying `biodivine_lib_bdd` variable set.
    pub fn bdd_variables(&self) -> &BddVariableSet {
        &self.variables
    }
}

impl Default for DdContextBuilder {
    fn default() -> Self {
        DdContextBuilder::new()
    }
}

impl DdContextBuilder {
    pub fn new() -> DdContextBuilder {
        DdContextBuilder {
            builder: BddVariableSetBuilder::new(),
            names: HashSet::new(),
            next_id: 0,
        }
    }

    /// Allocate a single untyped diagram variable.
    pub fn make_bit(&mut self, name: &str) -> BddVariable {
        let name = self.unique_name(name);
        self.builder.make_variable(name.as_str())
    }

    /// Allocate `count` consecutive untyped diagram variables named `{name}_{i}`.
    pub fn make_bits(&mut self, name: &str, count: usize) -> Vec<BddVariable> {
        (0..count)
            .map(|i| self.make_bit(&format!("{name}_{i}")))
            .collect()
    }

    /// Reserve an identifier for a variable whose bits are allocated separately
    /// (see [`VariableDd::over_bits`]).
    pub fn reserve_id(&mut self) -> VariableId {
        let id = VariableId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Allocate a typed variable with the given number of copies.
    pub fn make_variable(&mut self, name: &str, domain: Domain, copies: usize) -> VariableDd {
        let id = self.reserve_id();
        let mut bits = vec![Vec::new(); copies];
        for bit in 0..domain.num_bits() {
            for (copy, copy_bits) in bits.iter_mut().enumerate() {
                let suffix = if copy == 0 { String::new() } else { "'".repeat(copy) };
                copy_bits.push(self.make_bit(&format!("{name}_{bit}{suffix}")));
            }
        }
        VariableDd::over_bits(id, name.to_string(), domain, bits)
    }

    pub fn build(self) -> DdContext {
        DdContext {
            variables: self.builder.build(),
        }
    }

    /// Make `name` safe for the BDD library and distinct from all names allocated so far.
    fn unique_name(&mut self, name: &str) -> String {
        let base: String = name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        let mut candidate = base.clone();
        let mut index = 1;
        while self.names.contains(&candidate) {
            candidate = format!("{base}__{index}");
            index += 1;
        }
        self.names.insert(candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::DdContextBuilder;
    use crate::dd::{Domain, NEXT, PRESENT};

    #[test]
    fn copies_are_interleaved() {
        let mut builder = DdContextBuilder::new();
        let x = builder.make_variable("x", Domain::Int { lower: 0, upper: 3 }, 2);
        let y = builder.make_variable("x", Domain::Bool, 2);
        let ctx = builder.build();

        assert_eq!(ctx.num_vars(), 6);
        assert_eq!(x.bits(PRESENT).len(), 2);
        assert!(x.bits(PRESENT)[0] < x.bits(NEXT)[0]);
        assert!(x.bits(NEXT)[0] < x.bits(PRESENT)[1]);
        assert!(x.bits(NEXT)[1] < y.bits(PRESENT)[0]);
        assert_ne!(x.id(), y.id());
    }
}
