use crate::dd::{Cube, DdContext, Value, ValueType, mismatch};
use crate::error::BuildResult;
use biodivine_lib_bdd::{Bdd, BddVariable};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Hashable identity of a [`Value`] that agrees with its equality: integers that a float
/// represents exactly share the key of that float.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum ValueKey {
    Bool(bool),
    Int(i64),
    Number(u64),
    Enum(u32),
}

impl From<Value> for ValueKey {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(x) => ValueKey::Bool(x),
            Value::Enum(x) => ValueKey::Enum(x),
            Value::Int(x) => {
                let float = x as f64;
                if float as i64 == x && float != i64::MAX as f64 {
                    ValueKey::Number(float.to_bits())
                } else {
                    ValueKey::Int(x)
                }
            }
            // Both zeros compare equal.
            Value::Real(x) if x == 0.0 => ValueKey::Number(0f64.to_bits()),
            Value::Real(x) => ValueKey::Number(x.to_bits()),
        }
    }
}

/// A multi-terminal function over the variables of a [`DdContext`].
///
/// The function is stored as its *value partition*: a list of `(value, region)` terms where
/// the regions are non-empty, pairwise disjoint and jointly cover the whole variable space,
/// and no two terms carry equal values. The partition is thus canonical up to the order
/// of its terms, which makes semantic equality a simple term-by-term comparison.
///
/// Every pointwise operation works on the product of the operand partitions and only
/// evaluates the operator on non-empty regions, so errors (type mismatches, overflows)
/// are only reported for values that the function can actually take.
#[derive(Clone, Debug)]
pub struct Mtbdd {
    terms: Vec<(Value, Bdd)>,
}

impl PartialEq for Mtbdd {
    fn eq(&self, other: &Self) -> bool {
        if self.terms.len() != other.terms.len() {
            return false;
        }
        let regions: HashMap<ValueKey, &Bdd> = other
            .terms
            .iter()
            .map(|(value, region)| (ValueKey::from(*value), region))
            .collect();
        self.terms.iter().all(|(value, region)| {
            regions
                .get(&ValueKey::from(*value))
                .is_some_and(|r| r.iff(region).is_true())
        })
    }
}

impl Mtbdd {
    pub fn constant(ctx: &DdContext, value: Value) -> Mtbdd {
        Mtbdd {
            terms: vec![(value, ctx.mk_true())],
        }
    }

    /// The Boolean-valued function that is `true` exactly on `bdd`.
    pub fn from_bdd(bdd: &Bdd) -> Mtbdd {
        Mtbdd::from_terms(vec![
            (Value::Bool(true), bdd.clone()),
            (Value::Bool(false), bdd.not()),
        ])
    }

    /// The numeric function that is `1` on `bdd` and `0` elsewhere.
    pub fn indicator(bdd: &Bdd) -> Mtbdd {
        Mtbdd::from_terms(vec![(Value::Int(1), bdd.clone()), (Value::Int(0), bdd.not())])
    }

    /// Normalize a list of terms with disjoint regions that cover the whole space: empty
    /// regions are removed and the regions of equal values are merged.
    pub fn from_terms(terms: Vec<(Value, Bdd)>) -> Mtbdd {
        let mut result: Vec<(Value, Bdd)> = Vec::with_capacity(terms.len());
        let mut index: HashMap<ValueKey, usize> = HashMap::with_capacity(terms.len());
        for (value, region) in terms {
            if region.is_false() {
                continue;
            }
            match index.entry(ValueKey::from(value)) {
                Entry::Occupied(entry) => {
                    let existing = &mut result[*entry.get()];
                    existing.1 = existing.1.or(&region);
                }
                Entry::Vacant(entry) => {
                    entry.insert(result.len());
                    result.push((value, region));
                }
            }
        }
        debug_assert!(!result.is_empty(), "A function must cover the whole space.");
        Mtbdd { terms: result }
    }

    pub fn terms(&self) -> &[(Value, Bdd)] {
        &self.terms
    }

    /// The value of a constant function.
    pub fn constant_value(&self) -> Option<Value> {
        match self.terms.as_slice() {
            [(value, _)] => Some(*value),
            _ => None,
        }
    }

    /// The type that covers all values of this function. Mixed numeric functions are real.
    pub fn value_type(&self) -> ValueType {
        let values = self.terms.iter().map(|(v, _)| *v);
        if values.clone().all(|v| matches!(v, Value::Bool(_))) {
            ValueType::Bool
        } else if values.clone().all(|v| matches!(v, Value::Int(_))) {
            ValueType::Int
        } else if values.clone().all(|v| matches!(v, Value::Enum(_))) {
            let size = values
                .filter_map(|v| match v {
                    Value::Enum(x) => Some(x + 1),
                    _ => None,
                })
                .max()
                .unwrap_or(0);
            ValueType::Enum(size)
        } else {
            ValueType::Real
        }
    }

    /// Total number of BDD nodes used by the value partition.
    pub fn size(&self) -> usize {
        self.terms.iter().map(|(_, r)| r.size()).sum()
    }

    /// All values this function takes somewhere within `region`.
    pub fn values_on(&self, region: &Bdd) -> Vec<Value> {
        self.terms
            .iter()
            .filter(|(_, r)| !r.and(region).is_false())
            .map(|(v, _)| *v)
            .collect()
    }

    pub fn map<F>(&self, function: F) -> BuildResult<Mtbdd>
    where
        F: Fn(Value) -> BuildResult<Value>,
    {
        let mut terms = Vec::with_capacity(self.terms.len());
        for (value, region) in &self.terms {
            terms.push((function(*value)?, region.clone()));
        }
        Ok(Mtbdd::from_terms(terms))
    }

    pub fn combine<F>(&self, other: &Mtbdd, function: F) -> BuildResult<Mtbdd>
    where
        F: Fn(Value, Value) -> BuildResult<Value>,
    {
        let mut terms = Vec::new();
        for (a, left) in &self.terms {
            for (b, right) in &other.terms {
                let region = left.and(right);
                if !region.is_false() {
                    terms.push((function(*a, *b)?, region));
                }
            }
        }
        Ok(Mtbdd::from_terms(terms))
    }

    /// Lift an n-ary function pointwise over `operands`.
    pub fn apply<F>(ctx: &DdContext, operands: &[&Mtbdd], function: F) -> BuildResult<Mtbdd>
    where
        F: Fn(&[Value]) -> BuildResult<Value>,
    {
        let mut product: Vec<(Vec<Value>, Bdd)> = vec![(Vec::new(), ctx.mk_true())];
        for operand in operands {
            let mut extended = Vec::with_capacity(product.len() * operand.terms.len());
            for (values, region) in &product {
                for (value, operand_region) in &operand.terms {
                    let intersection = region.and(operand_region);
                    if !intersection.is_false() {
                        let mut values = values.clone();
                        values.push(*value);
                        extended.push((values, intersection));
                    }
                }
            }
            product = extended;
        }
        let mut terms = Vec::with_capacity(product.len());
        for (values, region) in product {
            terms.push((function(&values)?, region));
        }
        Ok(Mtbdd::from_terms(terms))
    }

    /// Pointwise selection: `then` where `condition` holds, `otherwise` elsewhere.
    pub fn ite(condition: &Bdd, then: &Mtbdd, otherwise: &Mtbdd) -> Mtbdd {
        let negated = condition.not();
        let terms = then
            .terms
            .iter()
            .map(|(v, r)| (*v, r.and(condition)))
            .chain(otherwise.terms.iter().map(|(v, r)| (*v, r.and(&negated))))
            .collect();
        Mtbdd::from_terms(terms)
    }

    /// Keep the value of this function on `region` and set it to zero elsewhere.
    pub fn and_bdd(&self, region: &Bdd) -> Mtbdd {
        let terms = self
            .terms
            .iter()
            .map(|(v, r)| (*v, r.and(region)))
            .chain(std::iter::once((Value::Int(0), region.not())))
            .collect();
        Mtbdd::from_terms(terms)
    }

    pub fn add(&self, other: &Mtbdd) -> BuildResult<Mtbdd> {
        self.combine(other, Value::add)
    }

    pub fn multiply(&self, other: &Mtbdd) -> BuildResult<Mtbdd> {
        self.combine(other, Value::multiply)
    }

    /// Pointwise division, except that the dividend is kept wherever the divisor is zero.
    pub fn divide_ignore_zero(&self, other: &Mtbdd) -> BuildResult<Mtbdd> {
        self.combine(other, |a, b| if b.is_zero() { Ok(a) } else { a.divide(b) })
    }

    /// The set on which this function is `true`.
    pub fn to_bdd(&self, ctx: &DdContext) -> BuildResult<Bdd> {
        let mut result = ctx.mk_false();
        for (value, region) in &self.terms {
            match value {
                Value::Bool(true) => result = result.or(region),
                Value::Bool(false) => (),
                _ => return Err(mismatch("bool", &[*value])),
            }
        }
        Ok(result)
    }

    /// The set on which this numeric function is strictly positive.
    pub fn greater_than_zero(&self, ctx: &DdContext) -> BuildResult<Bdd> {
        let mut result = ctx.mk_false();
        for (value, region) in &self.terms {
            match value.as_f64() {
                Some(x) if x > 0.0 => result = result.or(region),
                Some(_) => (),
                None => return Err(mismatch(">", &[*value])),
            }
        }
        Ok(result)
    }

    /// Sum out the variables of `cube`: `f[x := 0] + f[x := 1]` for every `x` in the cube.
    pub fn abstract_sum(&self, ctx: &DdContext, cube: &Cube) -> BuildResult<Mtbdd> {
        let mut result = self.clone();
        for variable in cube.variables() {
            let low = result.restrict(ctx, *variable, false);
            let high = result.restrict(ctx, *variable, true);
            result = low.add(&high)?;
        }
        Ok(result)
    }

    /// The cofactor of this function for `variable = value`.
    fn restrict(&self, ctx: &DdContext, variable: BddVariable, value: bool) -> Mtbdd {
        let literal = ctx.mk_literal(variable, value);
        let terms = self
            .terms
            .iter()
            .map(|(v, r)| (*v, r.and(&literal).exists(&[variable])))
            .collect();
        Mtbdd::from_terms(terms)
    }
}

#[cfg(test)]
mod tests {
    use crate::dd::{Cube, DdContextBuilder, Domain, Mtbdd, NEXT, PRESENT, Value, ValueType};

    #[test]
    fn partition_merges_equal_values() {
        let mut builder = DdContextBuilder::new();
        let x = builder.make_variable("x", Domain::Int { lower: 0, upper: 3 }, 1);
        let ctx = builder.build();

        let parity = x
            .value_encoding(&ctx, PRESENT)
            .map(|v| match v {
                Value::Int(n) => Ok(Value::Int(n % 2)),
                _ => unreachable!(),
            })
            .unwrap();
        assert_eq!(parity.terms().len(), 2);
        assert_eq!(parity.value_type(), ValueType::Int);
        let odd = x.int_value(&ctx, PRESENT, 1).or(&x.int_value(&ctx, PRESENT, 3));
        assert_eq!(parity.values_on(&odd), vec![Value::Int(1)]);
    }

    #[test]
    fn partition_merges_numbers_across_types() {
        let mut builder = DdContextBuilder::new();
        let x = builder.make_variable("x", Domain::Int { lower: 0, upper: 3 }, 1);
        let ctx = builder.build();
        let region = |n| x.int_value(&ctx, PRESENT, n);

        let merged = Mtbdd::from_terms(vec![
            (Value::Int(1), region(0)),
            (Value::Real(1.0), region(1)),
            (Value::Real(-0.0), region(2)),
            (Value::Int(0), region(3).or(&x.valid_values(&ctx, PRESENT).not())),
        ]);
        assert_eq!(merged.terms().len(), 2);
        assert_eq!(merged.terms()[0].0, Value::Int(1));
        assert!(merged.terms()[0].1.iff(&region(0).or(&region(1))).is_true());

        // Large domains project to one term per value.
        let mut builder = DdContextBuilder::new();
        let wide = Domain::Int {
            lower: 0,
            upper: 4095,
        };
        let y = builder.make_variable("y", wide, 1);
        let ctx = builder.build();
        assert_eq!(y.value_encoding(&ctx, PRESENT).terms().len(), 4096);
    }

    #[test]
    fn abstraction_sums_over_eliminated_variables() {
        let mut builder = DdContextBuilder::new();
        let x = builder.make_variable("x", Domain::Int { lower: 0, upper: 3 }, 2);
        let ctx = builder.build();

        // Weight 0.5 on every next value of `x`, regardless of the present value.
        let uniform = Mtbdd::constant(&ctx, Value::Real(0.5));
        let sum = uniform.abstract_sum(&ctx, &x.cube(NEXT)).unwrap();
        assert_eq!(sum, Mtbdd::constant(&ctx, Value::Int(2)));

        let normalized = uniform.divide_ignore_zero(&sum).unwrap();
        assert_eq!(normalized, Mtbdd::constant(&ctx, Value::Real(0.25)));
        let empty = Cube::empty();
        assert_eq!(uniform.abstract_sum(&ctx, &empty).unwrap(), uniform);
    }

    #[test]
    fn division_ignores_zero_divisor() {
        let mut builder = DdContextBuilder::new();
        let b = builder.make_variable("b", Domain::Bool, 1);
        let ctx = builder.build();
        let is_set = b.value_bdd(&ctx, PRESENT, &Value::Bool(true));

        let numerator = Mtbdd::constant(&ctx, Value::Int(3));
        let two = Mtbdd::constant(&ctx, Value::Int(2));
        let denominator = Mtbdd::indicator(&is_set).multiply(&two).unwrap();
        let result = numerator.divide_ignore_zero(&denominator).unwrap();
        assert_eq!(result.values_on(&is_set), vec![Value::Real(1.5)]);
        assert_eq!(result.values_on(&is_set.not()), vec![Value::Int(3)]);
        assert!(result.greater_than_zero(&ctx).unwrap().is_true());
    }

    #[test]
    fn boolean_conversion_rejects_numbers() {
        let ctx = DdContextBuilder::new().build();
        assert!(Mtbdd::constant(&ctx, Value::Int(1)).to_bdd(&ctx).is_err());
        assert!(Mtbdd::constant(&ctx, Value::Bool(true)).to_bdd(&ctx).unwrap().is_true());
        assert!(Mtbdd::constant(&ctx, Value::Bool(false)).greater_than_zero(&ctx).is_err());
    }
}
