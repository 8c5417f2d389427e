use crate::dd::{BitVector, Cube, DdContext, Mtbdd, Value, ValueType};
use crate::error::{BuildError, BuildResult};
use biodivine_lib_bdd::{Bdd, BddValuation, BddVariable};

/// Index of the present-state copy of a typed variable.
pub const PRESENT: usize = 0;
/// Index of the next-state copy of a typed variable.
pub const NEXT: usize = 1;
/// Widest supported encoding of one variable copy. Codes are enumerated as `u64`.
pub const MAX_VARIABLE_BITS: usize = 63;

/// Identifies a typed variable within one [`crate::dd::DdContext`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub(crate) usize);

/// The set of values a typed program variable can take.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Domain {
    Bool,
    /// Integers in the closed interval `[lower, upper]`.
    Int { lower: i64, upper: i64 },
    /// Enumeration with named constants (also used for automaton locations).
    Enum(Vec<String>),
}

/// Binary encoding of one typed variable, with one block of diagram variables per copy.
///
/// Values are encoded as unsigned offsets from the smallest value of the domain
/// (`value - lower` for integers, the ordinal for enumerations).
#[derive(Clone, Debug)]
pub struct VariableDd {
    id: VariableId,
    name: String,
    domain: Domain,
    copies: Vec<Vec<BddVariable>>,
}

impl Domain {
    pub fn num_values(&self) -> u64 {
        match self {
            Domain::Bool => 2,
            Domain::Int { lower, upper } => {
                let count = (*upper as i128 - *lower as i128 + 1).max(1);
                u64::try_from(count).unwrap_or(u64::MAX)
            }
            Domain::Enum(names) => names.len().max(1) as u64,
        }
    }

    /// Number of diagram variables needed to encode one copy.
    pub fn num_bits(&self) -> usize {
        (u64::BITS - (self.num_values() - 1).leading_zeros()) as usize
    }

    /// Fail if one copy of a variable `name` over this domain needs more than
    /// [`MAX_VARIABLE_BITS`] diagram variables.
    pub fn check_width(&self, name: &str) -> BuildResult<()> {
        let bits = self.num_bits();
        if bits > MAX_VARIABLE_BITS {
            return Err(BuildError::DomainTooWide {
                variable: name.to_string(),
                bits,
            });
        }
        Ok(())
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Domain::Bool => ValueType::Bool,
            Domain::Int { .. } => ValueType::Int,
            Domain::Enum(names) => ValueType::Enum(names.len() as u32),
        }
    }

    /// The value represented by an encoding. Codes beyond the domain extrapolate it.
    pub fn value_of_code(&self, code: u64) -> Value {
        match self {
            Domain::Bool => Value::Bool(code != 0),
            Domain::Int { lower, .. } => Value::Int(lower + code as i64),
            Domain::Enum(_) => Value::Enum(code as u32),
        }
    }

    /// The encoding of `value`, if the value belongs to this domain.
    pub fn code_of_value(&self, value: &Value) -> Option<u64> {
        match (self, value) {
            (Domain::Bool, Value::Bool(x)) => Some(u64::from(*x)),
            (Domain::Int { lower, upper }, Value::Int(x)) if lower <= x && x <= upper => {
                Some((*x as i128 - *lower as i128) as u64)
            }
            (Domain::Enum(names), Value::Enum(x)) if (*x as usize) < names.len() => {
                Some(u64::from(*x))
            }
            _ => None,
        }
    }

    /// Human readable form of a value of this domain.
    pub fn format_value(&self, value: &Value) -> String {
        match (self, value) {
            (Domain::Enum(names), Value::Enum(x)) => names
                .get(*x as usize)
                .cloned()
                .unwrap_or_else(|| value.to_string()),
            _ => value.to_string(),
        }
    }
}

impl VariableDd {
    /// Create a typed encoding over already allocated diagram variables.
    ///
    /// Each copy must contain at least [`Domain::num_bits`] variables. Surplus
    /// variables are treated as high-order bits that are zero for every valid value.
    pub fn over_bits(
        id: VariableId,
        name: String,
        domain: Domain,
        copies: Vec<Vec<BddVariable>>,
    ) -> VariableDd {
        debug_assert!(copies.iter().all(|it| it.len() >= domain.num_bits()));
        VariableDd {
            id,
            name,
            domain,
            copies,
        }
    }

    pub fn id(&self) -> VariableId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn num_copies(&self) -> usize {
        self.copies.len()
    }

    pub fn bits(&self, copy: usize) -> &[BddVariable] {
        &self.copies[copy]
    }

    pub fn is_integer(&self) -> bool {
        matches!(self.domain, Domain::Int { .. })
    }

    pub fn cube(&self, copy: usize) -> Cube {
        Cube::new(self.copies[copy].iter().copied())
    }

    /// The set of assignments of `copy` that encode exactly `code`.
    pub fn code_bdd(&self, ctx: &DdContext, copy: usize, code: u64) -> Bdd {
        let bits = &self.copies[copy];
        if bits.len() < u64::BITS as usize && code >> bits.len() != 0 {
            return ctx.mk_false();
        }
        bits.iter().enumerate().fold(ctx.mk_true(), |acc, (i, var)| {
            let bit = i < u64::BITS as usize && (code >> i) & 1 == 1;
            acc.and(&ctx.mk_literal(*var, bit))
        })
    }

    /// The set of assignments of `copy` that encode `value` (empty if `value` is not
    /// in the domain).
    pub fn value_bdd(&self, ctx: &DdContext, copy: usize, value: &Value) -> Bdd {
        match self.domain.code_of_value(value) {
            Some(code) => self.code_bdd(ctx, copy, code),
            None => ctx.mk_false(),
        }
    }

    pub fn int_value(&self, ctx: &DdContext, copy: usize, value: i64) -> Bdd {
        self.value_bdd(ctx, copy, &Value::Int(value))
    }

    /// The set of assignments of `copy` that encode a value of the domain.
    pub fn valid_values(&self, ctx: &DdContext, copy: usize) -> Bdd {
        let bits = &self.copies[copy];
        let num_values = self.domain.num_values();
        if bits.len() < u64::BITS as usize && num_values == 1u64 << bits.len() {
            return ctx.mk_true();
        }
        let raw = BitVector::unsigned(ctx, bits);
        let max = BitVector::from_int(ctx, (num_values - 1) as i64);
        raw.less_equal(ctx, &max)
    }

    /// Both copies hold the same encoding.
    pub fn eq_copies(&self, ctx: &DdContext, a: usize, b: usize) -> Bdd {
        self.copies[a]
            .iter()
            .zip(self.copies[b].iter())
            .fold(ctx.mk_true(), |acc, (x, y)| {
                acc.and(&ctx.mk_var(*x).iff(&ctx.mk_var(*y)))
            })
    }

    /// The multi-terminal function mapping every encoding of `copy` to its value.
    pub fn value_encoding(&self, ctx: &DdContext, copy: usize) -> Mtbdd {
        match &self.domain {
            Domain::Bool => {
                let bit = self.copies[copy]
                    .first()
                    .map(|var| ctx.mk_var(*var))
                    .unwrap_or_else(|| ctx.mk_false());
                Mtbdd::from_bdd(&bit)
            }
            Domain::Int { .. } => {
                let terms = (0..1u64 << self.copies[copy].len())
                    .map(|code| (self.domain.value_of_code(code), self.code_bdd(ctx, copy, code)))
                    .collect();
                Mtbdd::from_terms(terms)
            }
            Domain::Enum(_) => {
                let terms = (0..1u64 << self.copies[copy].len())
                    .map(|code| (Value::Enum(code as u32), self.code_bdd(ctx, copy, code)))
                    .collect();
                Mtbdd::from_terms(terms)
            }
        }
    }

    /// Two's-complement vector of the *value* (not the code) held by `copy`.
    ///
    /// The raw code bits are extended with a constant-false sign bit and then offset by
    /// the lower bound of the domain.
    pub fn bit_vector(&self, ctx: &DdContext, copy: usize) -> BitVector {
        let raw = BitVector::unsigned(ctx, &self.copies[copy]);
        match self.domain {
            Domain::Int { lower, .. } if lower != 0 => {
                raw.add(ctx, &BitVector::from_int(ctx, lower))
            }
            _ => raw,
        }
    }

    /// Read the value of `copy` from a full valuation of the context variables.
    pub fn decode(&self, valuation: &BddValuation, copy: usize) -> Value {
        let code = self.copies[copy]
            .iter()
            .enumerate()
            .filter(|(i, var)| *i < u64::BITS as usize && valuation.value(**var))
            .fold(0u64, |acc, (i, _)| acc | (1u64 << i));
        self.domain.value_of_code(code)
    }
}
