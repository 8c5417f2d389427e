use crate::error::{BuildError, BuildResult};
use std::fmt::{Display, Formatter};

/// A terminal value of a multi-terminal decision diagram.
///
/// Numeric values compare equal across `Int` and `Real` (i.e. `Int(1) == Real(1.0)`), which
/// keeps the value partition of an [`crate::dd::Mtbdd`] canonical after mixed arithmetic.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Bool(bool),
    Int(i64),
    Real(f64),
    /// Ordinal of an enumerated constant.
    Enum(u32),
}

/// Static type of a value or of a compiled expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueType {
    Bool,
    Int,
    Real,
    /// Enumeration with the given number of constants.
    Enum(u32),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Int(_) | Value::Real(_), Value::Int(_) | Value::Real(_)) => {
                self.as_f64() == other.as_f64()
            }
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(x) => write!(f, "{x}"),
            Value::Int(x) => write!(f, "{x}"),
            Value::Real(x) => write!(f, "{x}"),
            Value::Enum(x) => write!(f, "#{x}"),
        }
    }
}

impl Value {
    /// The type of this value. An isolated enum constant does not know its enumeration,
    /// so the reported size is the smallest one that contains it.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Real(_) => ValueType::Real,
            Value::Enum(x) => ValueType::Enum(x + 1),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Real(_))
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Value::Int(0)) || matches!(self, Value::Real(x) if *x == 0.0)
    }

    /// Numeric view of the value. Booleans and enums have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(x) => Some(*x as f64),
            Value::Real(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(x) => Some(*x),
            _ => None,
        }
    }

    /// Sum of two numeric values. Integer overflow and non-numeric operands are errors.
    pub fn add(self, other: Value) -> BuildResult<Value> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a
                .checked_add(b)
                .map(Value::Int)
                .ok_or_else(|| overflow("+", a, b)),
            _ => {
                let (a, b) = numeric("+", self, other)?;
                Ok(Value::Real(a + b))
            }
        }
    }

    pub fn subtract(self, other: Value) -> BuildResult<Value> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a
                .checked_sub(b)
                .map(Value::Int)
                .ok_or_else(|| overflow("-", a, b)),
            _ => {
                let (a, b) = numeric("-", self, other)?;
                Ok(Value::Real(a - b))
            }
        }
    }

    pub fn multiply(self, other: Value) -> BuildResult<Value> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a
                .checked_mul(b)
                .map(Value::Int)
                .ok_or_else(|| overflow("*", a, b)),
            _ => {
                let (a, b) = numeric("*", self, other)?;
                Ok(Value::Real(a * b))
            }
        }
    }

    /// Real division. Division by zero yields a non-finite real, as in IEEE arithmetic.
    pub fn divide(self, other: Value) -> BuildResult<Value> {
        let (a, b) = numeric("/", self, other)?;
        Ok(Value::Real(a / b))
    }

    pub fn negate(self) -> BuildResult<Value> {
        match self {
            Value::Int(a) => a
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| BuildError::Evaluation(format!("integer overflow in -({a})"))),
            Value::Real(a) => Ok(Value::Real(-a)),
            _ => Err(mismatch("-", &[self])),
        }
    }

    /// Numeric ordering. Only defined for numeric values (and equal enums/booleans).
    pub fn compare(self, other: Value) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(&b)),
            _ => {
                let (a, b) = (self.as_f64()?, other.as_f64()?);
                a.partial_cmp(&b)
            }
        }
    }
}

/// Build a [`BuildError::TypeMismatch`] for an operator and the offending operand values.
pub(crate) fn mismatch(operator: &str, operands: &[Value]) -> BuildError {
    let operands = operands
        .iter()
        .map(|it| format!("{it}: {:?}", it.value_type()))
        .collect::<Vec<_>>()
        .join(", ");
    BuildError::TypeMismatch {
        operator: operator.to_string(),
        operands,
    }
}

fn numeric(operator: &str, a: Value, b: Value) -> BuildResult<(f64, f64)> {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(mismatch(operator, &[a, b])),
    }
}

fn overflow(operator: &str, a: i64, b: i64) -> BuildError {
    BuildError::Evaluation(format!("integer overflow in {a} {operator} {b}"))
}
