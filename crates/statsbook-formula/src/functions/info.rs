//! Information functions

use crate::ast::FormulaExpr;
use crate::error::FormulaResult;
use crate::evaluator::EvaluationContext;
use statsbook_core::Value;

/// ISBLANK(value) - true for undefined and the empty string
pub fn fn_isblank(args: &[FormulaExpr], ctx: &mut EvaluationContext) -> FormulaResult<Value> {
    Ok(Value::Bool(ctx.evaluate(&args[0])?.is_empty()))
}

/// ISNA(value) - true only for undefined
///
/// Undefined is what `MATCH` and friends produce when nothing is found.
pub fn fn_isna(args: &[FormulaExpr], ctx: &mut EvaluationContext) -> FormulaResult<Value> {
    Ok(Value::Bool(matches!(
        ctx.evaluate(&args[0])?,
        Value::Undefined
    )))
}
