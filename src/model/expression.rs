use crate::dd::Value;
use crate::model::Operator;
use std::collections::HashMap;

/// Index of an expression node within its [`ExpressionPool`].
///
/// The pool is hash-consed, so two ids are equal iff the expressions are structurally equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(usize);

/// One node of an expression tree.
#[derive(Clone, Debug)]
pub enum Expression {
    /// A reference to a variable or a constant.
    Identifier(String),
    Literal(Value),
    Apply(Operator, Vec<ExprId>),
}

/// Hashable image of an [`Expression`]; real literals are compared by their bit pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum ExpressionKey {
    Identifier(String),
    Bool(bool),
    Int(i64),
    Real(u64),
    Enum(u32),
    Apply(Operator, Vec<ExprId>),
}

/// An append-only arena of hash-consed expressions.
#[derive(Clone, Debug, Default)]
pub struct ExpressionPool {
    nodes: Vec<Expression>,
    index: HashMap<ExpressionKey, ExprId>,
}

impl ExprId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<&Expression> for ExpressionKey {
    fn from(value: &Expression) -> Self {
        match value {
            Expression::Identifier(name) => ExpressionKey::Identifier(name.clone()),
            Expression::Literal(Value::Bool(x)) => ExpressionKey::Bool(*x),
            Expression::Literal(Value::Int(x)) => ExpressionKey::Int(*x),
            Expression::Literal(Value::Real(x)) => ExpressionKey::Real(x.to_bits()),
            Expression::Literal(Value::Enum(x)) => ExpressionKey::Enum(*x),
            Expression::Apply(op, args) => ExpressionKey::Apply(*op, args.clone()),
        }
    }
}

impl ExpressionPool {
    pub fn new() -> ExpressionPool {
        ExpressionPool::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the node of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was created by a different pool.
    pub fn get(&self, id: ExprId) -> &Expression {
        &self.nodes[id.0]
    }

    /// Add an expression, or return the id of a structurally equal one.
    pub fn insert(&mut self, expression: Expression) -> ExprId {
        let key = ExpressionKey::from(&expression);
        if let Some(id) = self.index.get(&key) {
            return *id;
        }
        let id = ExprId(self.nodes.len());
        self.nodes.push(expression);
        self.index.insert(key, id);
        id
    }

    pub fn identifier(&mut self, name: &str) -> ExprId {
        self.insert(Expression::Identifier(name.to_string()))
    }

    pub fn literal(&mut self, value: Value) -> ExprId {
        self.insert(Expression::Literal(value))
    }

    pub fn bool(&mut self, value: bool) -> ExprId {
        self.literal(Value::Bool(value))
    }

    pub fn int(&mut self, value: i64) -> ExprId {
        self.literal(Value::Int(value))
    }

    pub fn real(&mut self, value: f64) -> ExprId {
        self.literal(Value::Real(value))
    }

    pub fn apply(&mut self, operator: Operator, operands: Vec<ExprId>) -> ExprId {
        self.insert(Expression::Apply(operator, operands))
    }

    pub fn binary(&mut self, operator: Operator, left: ExprId, right: ExprId) -> ExprId {
        self.apply(operator, vec![left, right])
    }

    pub fn not(&mut self, operand: ExprId) -> ExprId {
        self.apply(Operator::Not, vec![operand])
    }

    pub fn ite(&mut self, condition: ExprId, then: ExprId, otherwise: ExprId) -> ExprId {
        self.apply(Operator::Ite, vec![condition, then, otherwise])
    }

    /// Render an expression in a prefix notation (used in diagnostics).
    pub fn display(&self, id: ExprId) -> String {
        match self.get(id) {
            Expression::Identifier(name) => name.clone(),
            Expression::Literal(value) => value.to_string(),
            Expression::Apply(op, args) => {
                let args = args
                    .iter()
                    .map(|arg| self.display(*arg))
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("({op} {args})")
            }
        }
    }
}
