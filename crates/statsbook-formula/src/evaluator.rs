//! Formula evaluator
//!
//! Evaluates formula ASTs against a [`CellResolver`], which supplies the
//! value of every referenced cell. The resolver is where sheet lookup,
//! caching and cycle detection live; the evaluator only walks the tree.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::functions::FunctionRegistry;
use statsbook_core::{Address, Value};
use std::sync::OnceLock;

/// Global function registry (lazily initialized)
static FUNCTION_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

fn get_function_registry() -> &'static FunctionRegistry {
    FUNCTION_REGISTRY.get_or_init(FunctionRegistry::new)
}

/// Source of cell values for references
pub trait CellResolver {
    /// Value of the cell at `address`, on `sheet` or on the sheet being
    /// evaluated when `sheet` is `None`
    ///
    /// An absent cell resolves to [`Value::Undefined`].
    fn resolve(&mut self, sheet: Option<&str>, address: &Address) -> FormulaResult<Value>;
}

/// Resolver with no cells at all; every reference is undefined
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCells;

impl CellResolver for NoCells {
    fn resolve(&mut self, _sheet: Option<&str>, _address: &Address) -> FormulaResult<Value> {
        Ok(Value::Undefined)
    }
}

/// Context for formula evaluation
pub struct EvaluationContext<'a> {
    resolver: &'a mut dyn CellResolver,
    /// Cell whose formula is being evaluated (for `ROW()`)
    pub current: Address,
}

impl<'a> EvaluationContext<'a> {
    /// Create a new evaluation context
    pub fn new(resolver: &'a mut dyn CellResolver, current: Address) -> Self {
        Self { resolver, current }
    }

    /// Evaluate an expression to a single value
    ///
    /// Ranges are rejected here; only aggregate arguments may be ranges.
    pub fn evaluate(&mut self, expr: &FormulaExpr) -> FormulaResult<Value> {
        match expr {
            // === Literals ===
            FormulaExpr::Number(n) => Ok(Value::Number(*n)),
            FormulaExpr::String(s) => Ok(Value::String(s.clone())),
            FormulaExpr::Boolean(b) => Ok(Value::Bool(*b)),

            // === References ===
            FormulaExpr::CellRef(cell_ref) => self
                .resolver
                .resolve(cell_ref.sheet.as_deref(), &cell_ref.address),
            FormulaExpr::RangeRef(_) => Err(FormulaError::RangeNotAllowed(expr.to_string())),

            // === Operators ===
            FormulaExpr::BinaryOp { op, left, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                evaluate_binary_op(*op, left, right)
            }
            FormulaExpr::UnaryOp {
                op: UnaryOperator::Negate,
                operand,
            } => {
                let value = self.evaluate(operand)?;
                let n = value.as_number().ok_or_else(|| {
                    FormulaError::TypeMismatch(format!("- applied to {}", value.type_name()))
                })?;
                Ok(Value::Number(-n))
            }

            // === Functions ===
            FormulaExpr::Function { name, args } => self.evaluate_function(name, args),
        }
    }

    /// Evaluate an argument into a flat sequence of values
    ///
    /// A range contributes every cell of its rectangle in row-major order;
    /// anything else contributes its single value.
    pub fn flatten(&mut self, expr: &FormulaExpr) -> FormulaResult<Vec<Value>> {
        match expr {
            FormulaExpr::RangeRef(range_ref) => {
                let range = range_ref.range();
                let sheet = range_ref.sheet.as_deref();
                let mut values = Vec::with_capacity(range.len());
                for address in range.iter() {
                    values.push(self.resolver.resolve(sheet, &address)?);
                }
                Ok(values)
            }
            other => Ok(vec![self.evaluate(other)?]),
        }
    }

    /// Flatten every argument in order
    pub fn flatten_all(&mut self, args: &[FormulaExpr]) -> FormulaResult<Vec<Value>> {
        let mut values = Vec::new();
        for arg in args {
            values.extend(self.flatten(arg)?);
        }
        Ok(values)
    }

    fn evaluate_function(&mut self, name: &str, args: &[FormulaExpr]) -> FormulaResult<Value> {
        let registry = get_function_registry();

        let func = registry
            .get(name)
            .ok_or_else(|| FormulaError::UnimplementedFunction(name.to_string()))?;

        // Check argument count
        if args.len() < func.min_args {
            return Err(FormulaError::ArgumentCount {
                function: name.to_string(),
                expected: format!("at least {}", func.min_args),
                actual: args.len(),
            });
        }

        if let Some(max) = func.max_args {
            if args.len() > max {
                return Err(FormulaError::ArgumentCount {
                    function: name.to_string(),
                    expected: format!("at most {}", max),
                    actual: args.len(),
                });
            }
        }

        // Arguments are handed over unevaluated so IF/AND/OR can short-circuit
        // and the aggregates can see ranges
        (func.implementation)(args, self)
    }
}

/// Evaluate a formula expression
pub fn evaluate(expr: &FormulaExpr, ctx: &mut EvaluationContext) -> FormulaResult<Value> {
    ctx.evaluate(expr)
}

/// Evaluate `expr` as the formula of the cell at `current`
pub fn evaluate_at(
    expr: &FormulaExpr,
    current: Address,
    resolver: &mut dyn CellResolver,
) -> FormulaResult<Value> {
    EvaluationContext::new(resolver, current).evaluate(expr)
}

fn type_mismatch(op: &str, left: &Value, right: &Value) -> FormulaError {
    FormulaError::TypeMismatch(format!(
        "{} applied to {} and {}",
        op,
        left.type_name(),
        right.type_name()
    ))
}

/// Evaluate a binary operation on already evaluated operands
fn evaluate_binary_op(op: BinaryOperator, left: Value, right: Value) -> FormulaResult<Value> {
    match op {
        // Arithmetic operators
        BinaryOperator::Add
        | BinaryOperator::Subtract
        | BinaryOperator::Multiply
        | BinaryOperator::Divide => {
            let (Some(l), Some(r)) = (left.as_number(), right.as_number()) else {
                return Err(type_mismatch(op.symbol(), &left, &right));
            };
            Ok(Value::Number(match op {
                BinaryOperator::Add => l + r,
                BinaryOperator::Subtract => l - r,
                BinaryOperator::Multiply => l * r,
                _ => l / r,
            }))
        }

        // Comparison operators
        BinaryOperator::Equal => Ok(Value::Bool(left == right)),
        BinaryOperator::NotEqual => Ok(Value::Bool(left != right)),
        BinaryOperator::LessThan
        | BinaryOperator::LessEqual
        | BinaryOperator::GreaterThan
        | BinaryOperator::GreaterEqual => {
            let ordering = match (&left, &right) {
                (Value::Number(l), Value::Number(r)) => l.partial_cmp(r),
                (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
                _ => return Err(type_mismatch(op.symbol(), &left, &right)),
            };
            // NaN compares false every way
            let Some(ordering) = ordering else {
                return Ok(Value::Bool(false));
            };
            Ok(Value::Bool(match op {
                BinaryOperator::LessThan => ordering.is_lt(),
                BinaryOperator::LessEqual => ordering.is_le(),
                BinaryOperator::GreaterThan => ordering.is_gt(),
                _ => ordering.is_ge(),
            }))
        }

        // Concatenation
        BinaryOperator::Concat => match (left, right) {
            (Value::String(l), Value::String(r)) => Ok(Value::String(l + &r)),
            (l, r) => Err(type_mismatch("&", &l, &r)),
        },
    }
}
