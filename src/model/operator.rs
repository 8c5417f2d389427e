use crate::dd::{Value, ValueType, mismatch};
use crate::error::{BuildError, BuildResult};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Operators of the expression language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    /// Real division.
    Divide,
    /// Euclidean integer remainder, never negative.
    Modulo,
    Negate,
    Min,
    Max,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// `condition ? then : otherwise`
    Ite,
    And,
    Or,
    Not,
    Implies,
    Iff,
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Negate => "neg",
            Operator::Min => "min",
            Operator::Max => "max",
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Ite => "ite",
            Operator::And => "&",
            Operator::Or => "|",
            Operator::Not => "!",
            Operator::Implies => "=>",
            Operator::Iff => "<=>",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Operator::Negate | Operator::Not => 1,
            Operator::Ite => 3,
            _ => 2,
        }
    }

    pub fn check_arity(&self, found: usize) -> BuildResult<()> {
        if found == self.arity() {
            Ok(())
        } else {
            Err(BuildError::Arity {
                operator: self.to_string(),
                expected: self.arity(),
                found,
            })
        }
    }

    /// Operators that have a dedicated two's-complement implementation.
    pub fn has_vector_form(&self) -> bool {
        matches!(
            self,
            Operator::Add
                | Operator::Negate
                | Operator::Subtract
                | Operator::Min
                | Operator::Max
                | Operator::Eq
                | Operator::Ne
                | Operator::Lt
                | Operator::Le
                | Operator::Gt
                | Operator::Ge
                | Operator::Ite
        )
    }

    /// Static type of the result, given the static types of the operands.
    pub fn result_type(&self, operands: &[ValueType]) -> BuildResult<ValueType> {
        self.check_arity(operands.len())?;
        let numeric = |t: &ValueType| matches!(t, ValueType::Int | ValueType::Real);
        let bad = || BuildError::TypeMismatch {
            operator: self.to_string(),
            operands: format!("{operands:?}"),
        };
        match self {
            Operator::Add
            | Operator::Subtract
            | Operator::Multiply
            | Operator::Min
            | Operator::Max => {
                match (operands[0], operands[1]) {
                    (ValueType::Int, ValueType::Int) => Ok(ValueType::Int),
                    (a, b) if numeric(&a) && numeric(&b) => Ok(ValueType::Real),
                    _ => Err(bad()),
                }
            }
            Operator::Divide if operands.iter().all(numeric) => Ok(ValueType::Real),
            Operator::Modulo if operands.iter().all(|t| *t == ValueType::Int) => Ok(ValueType::Int),
            Operator::Negate if numeric(&operands[0]) => Ok(operands[0]),
            Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge
                if operands.iter().all(numeric) =>
            {
                Ok(ValueType::Bool)
            }
            Operator::Eq | Operator::Ne => Ok(ValueType::Bool),
            Operator::And | Operator::Or | Operator::Not | Operator::Implies | Operator::Iff
                if operands.iter().all(|t| *t == ValueType::Bool) =>
            {
                Ok(ValueType::Bool)
            }
            Operator::Ite if operands[0] == ValueType::Bool => match (operands[1], operands[2]) {
                (a, b) if a == b => Ok(a),
                (ValueType::Enum(a), ValueType::Enum(b)) => Ok(ValueType::Enum(a.max(b))),
                (a, b) if numeric(&a) && numeric(&b) => Ok(ValueType::Real),
                _ => Err(bad()),
            },
            _ => Err(bad()),
        }
    }

    /// Evaluate the operator on concrete values.
    pub fn evaluate(&self, operands: &[Value]) -> BuildResult<Value> {
        self.check_arity(operands.len())?;
        let symbol = self.symbol();
        match self {
            Operator::Add => operands[0].add(operands[1]),
            Operator::Subtract => operands[0].subtract(operands[1]),
            Operator::Multiply => operands[0].multiply(operands[1]),
            Operator::Divide => operands[0].divide(operands[1]),
            Operator::Modulo => match (operands[0], operands[1]) {
                (Value::Int(_), Value::Int(0)) => Err(BuildError::Evaluation(format!(
                    "integer modulo by zero in {} % 0",
                    operands[0]
                ))),
                (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.rem_euclid(b))),
                _ => Err(mismatch(symbol, operands)),
            },
            Operator::Negate => operands[0].negate(),
            Operator::Min | Operator::Max => {
                let ordering = operands[0]
                    .compare(operands[1])
                    .ok_or_else(|| mismatch(symbol, operands))?;
                let first = (ordering != Ordering::Greater) == (*self == Operator::Min);
                Ok(if first { operands[0] } else { operands[1] })
            }
            Operator::Eq | Operator::Ne => {
                if class(&operands[0]) != class(&operands[1]) {
                    return Err(mismatch(symbol, operands));
                }
                Ok(Value::Bool((operands[0] == operands[1]) == (*self == Operator::Eq)))
            }
            Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge => {
                let ordering = match (operands[0].is_numeric(), operands[1].is_numeric()) {
                    (true, true) => operands[0].compare(operands[1]),
                    _ => None,
                }
                .ok_or_else(|| mismatch(symbol, operands))?;
                Ok(Value::Bool(match self {
                    Operator::Lt => ordering == Ordering::Less,
                    Operator::Le => ordering != Ordering::Greater,
                    Operator::Gt => ordering == Ordering::Greater,
                    _ => ordering != Ordering::Less,
                }))
            }
            Operator::Ite => match operands[0] {
                Value::Bool(true) => Ok(operands[1]),
                Value::Bool(false) => Ok(operands[2]),
                _ => Err(mismatch(symbol, operands)),
            },
            Operator::Not => match operands[0] {
                Value::Bool(x) => Ok(Value::Bool(!x)),
                _ => Err(mismatch(symbol, operands)),
            },
            Operator::And | Operator::Or | Operator::Implies | Operator::Iff => {
                let (Some(a), Some(b)) = (operands[0].as_bool(), operands[1].as_bool()) else {
                    return Err(mismatch(symbol, operands));
                };
                Ok(Value::Bool(match self {
                    Operator::And => a && b,
                    Operator::Or => a || b,
                    Operator::Implies => !a || b,
                    _ => a == b,
                }))
            }
        }
    }
}

/// Values of the same class can be tested for equality.
fn class(value: &Value) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Int(_) | Value::Real(_) => 1,
        Value::Enum(_) => 2,
    }
}
