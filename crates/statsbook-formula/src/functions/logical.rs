//! Logical functions

use crate::ast::FormulaExpr;
use crate::error::FormulaResult;
use crate::evaluator::EvaluationContext;
use statsbook_core::Value;

/// IF(condition, if_true, [if_false])
///
/// Only the selected branch is evaluated. A false condition with no
/// `if_false` gives undefined.
pub fn fn_if(args: &[FormulaExpr], ctx: &mut EvaluationContext) -> FormulaResult<Value> {
    if ctx.evaluate(&args[0])?.is_true() {
        ctx.evaluate(&args[1])
    } else {
        match args.get(2) {
            Some(if_false) => ctx.evaluate(if_false),
            None => Ok(Value::Undefined),
        }
    }
}

/// AND(value, ...) - stops at the first false argument
pub fn fn_and(args: &[FormulaExpr], ctx: &mut EvaluationContext) -> FormulaResult<Value> {
    for arg in args {
        if !ctx.evaluate(arg)?.is_true() {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

/// OR(value, ...) - stops at the first true argument
pub fn fn_or(args: &[FormulaExpr], ctx: &mut EvaluationContext) -> FormulaResult<Value> {
    for arg in args {
        if ctx.evaluate(arg)?.is_true() {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}
