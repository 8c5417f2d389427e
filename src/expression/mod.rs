//! Lowering of typed expressions into decision diagrams.
//!
//! [`ExpressionToDd`] compiles expressions of one [`ExpressionPool`] over a fixed set of
//! registered variable encodings and constants. Integer arithmetic and comparisons are
//! performed on two's-complement bit-vectors whenever all relevant operands have a vector
//! form, which keeps intermediate diagrams much smaller than the value-by-value
//! multi-terminal product. Everything else goes through [`Mtbdd::apply`].

use crate::dd::{
    BitVector, DdContext, Domain, Mtbdd, PRESENT, Value, ValueType, VariableDd, VariableId,
};
use crate::error::{BuildError, BuildResult};
use crate::model::{ExprId, Expression, ExpressionPool, Operator};
use biodivine_lib_bdd::Bdd;
use log::trace;
use std::collections::HashMap;
use std::rc::Rc;

mod lowered;


pub use lowered::Lowered;

/// Switches of the expression compiler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpressionOptions {
    /// Memoize lowered values per expression (default: `true`). Cached values are shared,
    /// so compiling an expression twice returns the same [`Rc`].
    pub use_cache: bool,
    /// Use the two's-complement encoding for integer arithmetic (default: `true`).
    pub use_vector: bool,
}

impl Default for ExpressionOptions {
    fn default() -> Self {
        ExpressionOptions {
            use_cache: true,
            use_vector: true,
        }
    }
}

pub struct ExpressionToDd<'a> {
    ctx: &'a DdContext,
    expressions: &'a ExpressionPool,
    options: ExpressionOptions,
    variables: HashMap<String, VariableDd>,
    constants: HashMap<String, Mtbdd>,
    cache: Vec<Option<Rc<Lowered>>>,
    assignments: HashMap<(VariableId, usize, ExprId), Bdd>,
}

impl<'a> ExpressionToDd<'a> {
    pub fn new(
        ctx: &'a DdContext,
        expressions: &'a ExpressionPool,
        options: ExpressionOptions,
    ) -> ExpressionToDd<'a> {
        ExpressionToDd {
            ctx,
            expressions,
            options,
            variables: HashMap::new(),
            constants: HashMap::new(),
            cache: vec![None; expressions.len()],
            assignments: HashMap::new(),
        }
    }

    pub fn context(&self) -> &'a DdContext {
        self.ctx
    }

    pub fn options(&self) -> ExpressionOptions {
        self.options
    }

    /// Make `variable` visible under `name`, replacing any previous variable of that name.
    ///
    /// Registration invalidates all memoized results.
    pub fn register_variable(&mut self, name: &str, variable: VariableDd) {
        self.variables.insert(name.to_string(), variable);
        self.clear_cache();
    }

    /// Make `value` visible under `name`. Constant integer and enum functions are lowered
    /// like literals, so they keep a two's-complement form.
    pub fn register_constant(&mut self, name: &str, value: Mtbdd) {
        self.constants.insert(name.to_string(), value);
        self.clear_cache();
    }

    pub fn register_value(&mut self, name: &str, value: Value) {
        let constant = Mtbdd::constant(self.ctx, value);
        self.register_constant(name, constant);
    }

    pub fn variable(&self, name: &str) -> Option<&VariableDd> {
        self.variables.get(name)
    }

    pub fn clear_cache(&mut self) {
        self.cache.iter_mut().for_each(|it| *it = None);
        self.assignments.clear();
    }

    /// Compile `expr` over the present copy of the registered variables.
    pub fn lower(&mut self, expr: ExprId) -> BuildResult<Rc<Lowered>> {
        if !self.options.use_cache {
            return Ok(Rc::new(self.lower_node(expr)?));
        }
        if let Some(Some(cached)) = self.cache.get(expr.index()) {
            return Ok(cached.clone());
        }
        let lowered = Rc::new(self.lower_node(expr)?);
        if let Some(slot) = self.cache.get_mut(expr.index()) {
            *slot = Some(lowered.clone());
        }
        Ok(lowered)
    }

    /// Compile `expr` into a single multi-terminal function.
    pub fn compile(&mut self, expr: ExprId) -> BuildResult<Mtbdd> {
        let lowered = self.lower(expr)?;
        Ok(lowered.single(self.ctx)?.clone())
    }

    /// Compile a Boolean expression into the set of states where it holds.
    pub fn compile_bdd(&mut self, expr: ExprId) -> BuildResult<Bdd> {
        let lowered = self.lower(expr)?;
        lowered.single(self.ctx)?.to_bdd(self.ctx)
    }

    /// The relation `variable[copy] = expr`, with `expr` evaluated over the present copy.
    ///
    /// Values that `variable` cannot encode are either dropped or mapped to unused codes,
    /// see [`ExpressionToDd::value_in_range`].
    pub fn compile_assignment(
        &mut self,
        variable: &VariableDd,
        copy: usize,
        expr: ExprId,
    ) -> BuildResult<Bdd> {
        let key = (variable.id(), copy, expr);
        if self.options.use_cache {
            if let Some(cached) = self.assignments.get(&key) {
                return Ok(cached.clone());
            }
        }
        let ctx = self.ctx;
        let lowered = self.lower(expr)?;
        let result = match lowered.vector() {
            Some(vector) if variable.is_integer() && lowered.has_int_vector() => {
                variable.bit_vector(ctx, copy).equal(ctx, vector)
            }
            _ => {
                let single = lowered.single(ctx)?;
                single
                    .terms()
                    .iter()
                    .fold(ctx.mk_false(), |acc, (value, region)| {
                        acc.or(&region.and(&variable.value_bdd(ctx, copy, value)))
                    })
            }
        };
        if self.options.use_cache {
            self.assignments.insert(key, result.clone());
        }
        Ok(result)
    }

    /// The set of present states in which `expr` evaluates to a value of `variable`'s domain.
    pub fn value_in_range(&mut self, variable: &VariableDd, expr: ExprId) -> BuildResult<Bdd> {
        let ctx = self.ctx;
        let lowered = self.lower(expr)?;
        match (variable.domain(), lowered.vector()) {
            (Domain::Int { lower, upper }, Some(vector)) if lowered.has_int_vector() => {
                let lower = BitVector::from_int(ctx, *lower);
                let upper = BitVector::from_int(ctx, *upper);
                Ok(vector
                    .greater_equal(ctx, &lower)
                    .and(&vector.less_equal(ctx, &upper)))
            }
            (domain, _) => {
                let single = lowered.single(ctx)?;
                Ok(single
                    .terms()
                    .iter()
                    .filter(|(value, _)| domain.code_of_value(value).is_some())
                    .fold(ctx.mk_false(), |acc, (_, region)| acc.or(region)))
            }
        }
    }

    fn lower_node(&mut self, expr: ExprId) -> BuildResult<Lowered> {
        let expressions = self.expressions;
        match expressions.get(expr) {
            Expression::Identifier(name) => self.lower_identifier(name),
            Expression::Literal(value) => Ok(self.lower_literal(*value)),
            Expression::Apply(operator, operands) => self.lower_apply(*operator, operands),
        }
    }

    fn lower_identifier(&self, name: &str) -> BuildResult<Lowered> {
        if let Some(variable) = self.variables.get(name) {
            let value_type = variable.domain().value_type();
            if self.options.use_vector && variable.is_integer() {
                let vector = variable.bit_vector(self.ctx, PRESENT);
                Ok(Lowered::from_vector(vector, value_type))
            } else {
                let single = variable.value_encoding(self.ctx, PRESENT);
                Ok(Lowered::from_single(single, value_type))
            }
        } else if let Some(constant) = self.constants.get(name) {
            match constant.constant_value() {
                Some(value) => Ok(self.lower_literal(value)),
                None => Ok(Lowered::from_single(constant.clone(), constant.value_type())),
            }
        } else {
            Err(BuildError::UnknownIdentifier(name.to_string()))
        }
    }

    fn lower_literal(&self, value: Value) -> Lowered {
        match value {
            Value::Int(n) if self.options.use_vector => {
                Lowered::from_vector(BitVector::from_int(self.ctx, n), ValueType::Int)
            }
            Value::Enum(n) if self.options.use_vector => Lowered::from_vector(
                BitVector::from_int(self.ctx, i64::from(n)),
                value.value_type(),
            ),
            _ => Lowered::from_single(Mtbdd::constant(self.ctx, value), value.value_type()),
        }
    }

    fn lower_apply(&mut self, operator: Operator, arguments: &[ExprId]) -> BuildResult<Lowered> {
        operator.check_arity(arguments.len())?;
        let mut operands = Vec::with_capacity(arguments.len());
        for argument in arguments {
            operands.push(self.lower(*argument)?);
        }
        let types: Vec<ValueType> = operands.iter().map(|it| it.value_type()).collect();
        let value_type = operator.result_type(&types)?;
        let ctx = self.ctx;

        // The condition of `ite` is always a plain Boolean function.
        let vector_operands = if operator == Operator::Ite {
            &operands[1..]
        } else {
            &operands[..]
        };
        if self.options.use_vector
            && operator.has_vector_form()
            && vector_operands.iter().all(|it| it.has_int_vector())
        {
            trace!("Lowering `{operator}` using two's-complement vectors.");
            let vectors: Vec<&BitVector> =
                vector_operands.iter().filter_map(|it| it.vector()).collect();
            return lower_vector(ctx, operator, &operands, &vectors, value_type);
        }

        if operator == Operator::Ite {
            let condition = operands[0].single(ctx)?.to_bdd(ctx)?;
            let then = operands[1].single(ctx)?;
            let otherwise = operands[2].single(ctx)?;
            return Ok(Lowered::from_single(
                Mtbdd::ite(&condition, then, otherwise),
                value_type,
            ));
        }

        let mut singles = Vec::with_capacity(operands.len());
        for operand in &operands {
            singles.push(operand.single(ctx)?);
        }
        let result = Mtbdd::apply(ctx, &singles, |values| operator.evaluate(values))?;
        Ok(Lowered::from_single(result, value_type))
    }
}

/// Evaluate an operator with a two's-complement form on the `vectors` of its operands.
fn lower_vector(
    ctx: &DdContext,
    operator: Operator,
    operands: &[Rc<Lowered>],
    vectors: &[&BitVector],
    value_type: ValueType,
) -> BuildResult<Lowered> {
    let vector =
        |v: BitVector| -> BuildResult<Lowered> { Ok(Lowered::from_vector(v, value_type)) };
    let boolean = |b: Bdd| -> BuildResult<Lowered> {
        Ok(Lowered::from_single(Mtbdd::from_bdd(&b), ValueType::Bool))
    };
    match operator {
        Operator::Add => vector(vectors[0].add(ctx, vectors[1])),
        Operator::Subtract => vector(vectors[0].subtract(ctx, vectors[1])),
        Operator::Negate => vector(vectors[0].negate(ctx)),
        Operator::Min => vector(vectors[0].min(ctx, vectors[1])),
        Operator::Max => vector(vectors[0].max(ctx, vectors[1])),
        Operator::Eq => boolean(vectors[0].equal(ctx, vectors[1])),
        Operator::Ne => boolean(vectors[0].not_equal(ctx, vectors[1])),
        Operator::Lt => boolean(vectors[0].less(ctx, vectors[1])),
        Operator::Le => boolean(vectors[0].less_equal(ctx, vectors[1])),
        Operator::Gt => boolean(vectors[0].greater(ctx, vectors[1])),
        Operator::Ge => boolean(vectors[0].greater_equal(ctx, vectors[1])),
        Operator::Ite => {
            let condition = operands[0].single(ctx)?.to_bdd(ctx)?;
            vector(BitVector::ite(&condition, vectors[0], vectors[1]))
        }
        _ => unreachable!("Operator `{operator}` has no vector form."),
    }
}
