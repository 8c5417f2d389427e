//! Decision-diagram layer shared by the rest of the crate.
//!
//! Boolean functions are plain [`biodivine_lib_bdd::Bdd`] objects. On top of them, this module
//! provides the multi-terminal functions ([`Mtbdd`]), two's-complement bit-vectors
//! ([`BitVector`]) and the typed present/next encoding of program variables ([`VariableDd`]).
//!
//! All diagrams of one graph share a single [`DdContext`]. The context is immutable, so every
//! diagram variable has to be allocated up-front through a [`DdContextBuilder`].

mod bit_vector;
mod context;
mod cube;
mod mtbdd;
mod value;
mod variable;

pub use bit_vector::BitVector;
pub use context::{DdContext, DdContextBuilder};
pub use cube::{Cube, Permutation};
pub use mtbdd::Mtbdd;
pub use value::{Value, ValueType};
pub use variable::{Domain, MAX_VARIABLE_BITS, NEXT, PRESENT, VariableDd, VariableId};

pub(crate) use value::mismatch;
