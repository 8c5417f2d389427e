use crate::dd::{BitVector, DdContext, Mtbdd, ValueType};
use crate::error::BuildResult;
use std::cell::OnceCell;

/// The result of compiling one expression.
///
/// A lowered value holds a single multi-terminal function, a two's-complement
/// [`BitVector`], or both. When only the vector is known, the single function is projected
/// from it on first request and memoized.
#[derive(Debug)]
pub struct Lowered {
    single: OnceCell<Mtbdd>,
    vector: Option<BitVector>,
    value_type: ValueType,
}

impl Lowered {
    pub fn from_single(single: Mtbdd, value_type: ValueType) -> Lowered {
        Lowered {
            single: OnceCell::from(single),
            vector: None,
            value_type,
        }
    }

    pub fn from_vector(vector: BitVector, value_type: ValueType) -> Lowered {
        Lowered {
            single: OnceCell::new(),
            vector: Some(vector),
            value_type,
        }
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn vector(&self) -> Option<&BitVector> {
        self.vector.as_ref()
    }

    /// True if an integer-typed vector representation is available.
    pub fn has_int_vector(&self) -> bool {
        self.vector.is_some() && self.value_type == ValueType::Int
    }

    /// The value as a single multi-terminal function.
    pub fn single(&self, ctx: &DdContext) -> BuildResult<&Mtbdd> {
        if let Some(single) = self.single.get() {
            return Ok(single);
        }
        let projected = match (&self.vector, self.value_type) {
            (Some(vector), ValueType::Enum(size)) => vector.project_enum(ctx, size),
            (Some(vector), _) => vector.project(ctx)?,
            (None, _) => unreachable!("Lowered value has neither representation."),
        };
        Ok(self.single.get_or_init(|| projected))
    }
}
