use crate::dd::{DdContext, NEXT, PRESENT, VariableDd};
use biodivine_lib_bdd::{Bdd, BddVariable};

/// A fixed set of diagram variables, used to specify which variables an abstraction
/// (existential quantification, summation) eliminates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cube {
    variables: Vec<BddVariable>,
}

/// Renames between the present and the next copy of a set of typed variables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Permutation {
    present: Vec<BddVariable>,
    next: Vec<BddVariable>,
}

impl Cube {
    pub fn new<I: IntoIterator<Item = BddVariable>>(variables: I) -> Cube {
        let mut variables: Vec<BddVariable> = variables.into_iter().collect();
        variables.sort();
        variables.dedup();
        Cube { variables }
    }

    pub fn empty() -> Cube {
        Cube::default()
    }

    pub fn union(&self, other: &Cube) -> Cube {
        Cube::new(self.variables.iter().chain(other.variables.iter()).copied())
    }

    pub fn variables(&self) -> &[BddVariable] {
        &self.variables
    }

    pub fn contains(&self, variable: BddVariable) -> bool {
        self.variables.binary_search(&variable).is_ok()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// The cube as a diagram: the conjunction of its positive literals.
    pub fn to_bdd(&self, ctx: &DdContext) -> Bdd {
        self.variables
            .iter()
            .fold(ctx.mk_true(), |acc, var| acc.and(&ctx.mk_var(*var)))
    }

    /// Existentially quantify all cube variables in `bdd`.
    pub fn exists(&self, bdd: &Bdd) -> Bdd {
        bdd.exists(&self.variables)
    }
}

impl Permutation {
    pub fn new<'a, I: IntoIterator<Item = &'a VariableDd>>(variables: I) -> Permutation {
        let mut present = Vec::new();
        let mut next = Vec::new();
        for variable in variables {
            present.extend_from_slice(variable.bits(PRESENT));
            next.extend_from_slice(variable.bits(NEXT));
        }
        Permutation { present, next }
    }

    pub fn len(&self) -> usize {
        self.present.len()
    }

    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }

    pub fn present_cube(&self) -> Cube {
        Cube::new(self.present.iter().copied())
    }

    pub fn next_cube(&self) -> Cube {
        Cube::new(self.next.iter().copied())
    }

    /// Rename next-copy variables of `bdd` to their present copies.
    ///
    /// The function must not depend on present-copy variables of this permutation.
    pub fn to_present(&self, ctx: &DdContext, bdd: &Bdd) -> Bdd {
        bdd.and(&self.copies_equal(ctx)).exists(&self.next)
    }

    /// Rename present-copy variables of `bdd` to their next copies.
    ///
    /// The function must not depend on next-copy variables of this permutation.
    pub fn to_next(&self, ctx: &DdContext, bdd: &Bdd) -> Bdd {
        bdd.and(&self.copies_equal(ctx)).exists(&self.present)
    }

    fn copies_equal(&self, ctx: &DdContext) -> Bdd {
        self.present
            .iter()
            .zip(self.next.iter())
            .fold(ctx.mk_true(), |acc, (p, n)| {
                acc.and(&ctx.mk_var(*p).iff(&ctx.mk_var(*n)))
            })
    }
}
