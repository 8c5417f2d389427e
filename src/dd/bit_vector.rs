use crate::dd::{DdContext, Mtbdd, Value};
use crate::error::{BuildError, BuildResult};
use biodivine_lib_bdd::{Bdd, BddVariable};

/// A two's-complement integer whose bits are Boolean functions.
///
/// Bits are stored low bit first; the last bit is the sign bit, so a vector
/// `b_0 .. b_{n-1}` denotes `sum_{i < n-1} b_i * 2^i - b_{n-1} * 2^{n-1}`.
/// All operations sign-extend their operands to a common width first, and
/// arithmetic results are one bit wider than their widest operand, so no
/// operation ever overflows.
#[derive(Clone, Debug)]
pub struct BitVector {
    bits: Vec<Bdd>,
}

/// Number of bits of the shortest two's-complement representation of `number`.
fn min_width(number: i64) -> usize {
    let magnitude = if number < 0 {
        -(number as i128)
    } else {
        number as i128 + 1
    };
    let max = (magnitude - 1) as u128;
    (u128::BITS - max.leading_zeros()) as usize + 1
}

impl BitVector {
    pub fn from_bits(bits: Vec<Bdd>) -> BitVector {
        assert!(!bits.is_empty(), "A two's-complement vector needs a sign bit.");
        BitVector { bits }
    }

    /// The shortest vector holding the constant `number`.
    pub fn from_int(ctx: &DdContext, number: i64) -> BitVector {
        BitVector::from_int_width(ctx, number, min_width(number))
    }

    /// The constant `number` truncated or sign-extended to `width` bits.
    pub fn from_int_width(ctx: &DdContext, number: i64, width: usize) -> BitVector {
        let bits = (0..width.max(1))
            .map(|i| {
                let bit = if i < 64 { (number >> i) & 1 == 1 } else { number < 0 };
                ctx.mk_constant(bit)
            })
            .collect();
        BitVector { bits }
    }

    /// Interpret `variables` as an unsigned number (an extra constant-false sign bit is added).
    pub fn unsigned(ctx: &DdContext, variables: &[BddVariable]) -> BitVector {
        let mut bits: Vec<Bdd> = variables.iter().map(|var| ctx.mk_var(*var)).collect();
        bits.push(ctx.mk_false());
        BitVector { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[Bdd] {
        &self.bits
    }

    pub fn sign(&self) -> &Bdd {
        &self.bits[self.bits.len() - 1]
    }

    /// Repeat the sign bit until the vector has `width` bits.
    pub fn sign_extend(&self, width: usize) -> BitVector {
        let mut bits = self.bits.clone();
        while bits.len() < width {
            bits.push(self.sign().clone());
        }
        BitVector { bits }
    }

    pub fn add(&self, ctx: &DdContext, other: &BitVector) -> BitVector {
        let width = self.len().max(other.len()) + 1;
        let a = self.sign_extend(width);
        let b = other.sign_extend(width);
        let mut carry = ctx.mk_false();
        let mut bits = Vec::with_capacity(width);
        for (x, y) in a.bits.iter().zip(b.bits.iter()) {
            bits.push(x.xor(y).xor(&carry));
            carry = x.and(y).or(&x.and(&carry)).or(&y.and(&carry));
        }
        BitVector { bits }
    }

    pub fn negate(&self, ctx: &DdContext) -> BitVector {
        let complement = BitVector {
            bits: self.bits.iter().map(|it| it.not()).collect(),
        };
        complement.add(ctx, &BitVector::from_int(ctx, 1))
    }

    pub fn subtract(&self, ctx: &DdContext, other: &BitVector) -> BitVector {
        self.add(ctx, &other.negate(ctx))
    }

    pub fn equal(&self, ctx: &DdContext, other: &BitVector) -> Bdd {
        let width = self.len().max(other.len());
        let a = self.sign_extend(width);
        let b = other.sign_extend(width);
        a.bits
            .iter()
            .zip(b.bits.iter())
            .fold(ctx.mk_true(), |acc, (x, y)| acc.and(&x.iff(y)))
    }

    pub fn not_equal(&self, ctx: &DdContext, other: &BitVector) -> Bdd {
        self.equal(ctx, other).not()
    }

    pub fn less(&self, ctx: &DdContext, other: &BitVector) -> Bdd {
        self.subtract(ctx, other).sign().clone()
    }

    pub fn less_equal(&self, ctx: &DdContext, other: &BitVector) -> Bdd {
        self.less(ctx, other).or(&self.equal(ctx, other))
    }

    pub fn greater(&self, ctx: &DdContext, other: &BitVector) -> Bdd {
        other.less(ctx, self)
    }

    pub fn greater_equal(&self, ctx: &DdContext, other: &BitVector) -> Bdd {
        other.less_equal(ctx, self)
    }

    pub fn min(&self, ctx: &DdContext, other: &BitVector) -> BitVector {
        BitVector::ite(&self.less(ctx, other), self, other)
    }

    pub fn max(&self, ctx: &DdContext, other: &BitVector) -> BitVector {
        BitVector::ite(&self.greater(ctx, other), self, other)
    }

    /// Bitwise selection between two vectors.
    pub fn ite(condition: &Bdd, then: &BitVector, otherwise: &BitVector) -> BitVector {
        let width = then.len().max(otherwise.len());
        let a = then.sign_extend(width);
        let b = otherwise.sign_extend(width);
        let bits = a
            .bits
            .iter()
            .zip(b.bits.iter())
            .map(|(x, y)| condition.and(x).or(&condition.not().and(y)))
            .collect();
        BitVector { bits }
    }

    /// The integer value of this vector as a multi-terminal function.
    pub fn project(&self, ctx: &DdContext) -> BuildResult<Mtbdd> {
        if self.len() > 63 {
            return Err(BuildError::Evaluation(format!(
                "a {}-bit vector does not fit into a 64-bit integer",
                self.len()
            )));
        }
        let mut result = Mtbdd::constant(ctx, Value::Int(0));
        let sign = self.len() - 1;
        for (i, bit) in self.bits.iter().enumerate() {
            let weight = if i == sign { -(1i64 << i) } else { 1i64 << i };
            let term = Mtbdd::from_terms(vec![
                (Value::Int(weight), bit.clone()),
                (Value::Int(0), bit.not()),
            ]);
            result = result.add(&term)?;
        }
        Ok(result)
    }

    /// The enumeration constant selected by this vector, for an enumeration of `size`
    /// constants. Ordinals outside the enumeration map to the first constant.
    pub fn project_enum(&self, ctx: &DdContext, size: u32) -> Mtbdd {
        let mut result = Mtbdd::constant(ctx, Value::Enum(0));
        for ordinal in 0..size {
            let selected = BitVector::from_int(ctx, i64::from(ordinal)).equal(ctx, self);
            result = Mtbdd::ite(&selected, &Mtbdd::constant(ctx, Value::Enum(ordinal)), &result);
        }
        result
    }
}
