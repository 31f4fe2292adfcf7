//! Math functions

use super::criteria::CriteriaMatcher;
use crate::ast::FormulaExpr;
use crate::error::FormulaResult;
use crate::evaluator::EvaluationContext;
use statsbook_core::Value;

/// SUM(value, ...) - adds the number-typed values, ignoring everything else
pub fn fn_sum(args: &[FormulaExpr], ctx: &mut EvaluationContext) -> FormulaResult<Value> {
    let total = ctx
        .flatten_all(args)?
        .iter()
        .filter_map(|v| match v {
            Value::Number(n) => Some(*n),
            _ => None,
        })
        .sum();
    Ok(Value::Number(total))
}

/// SUMIF(range, criteria, [sum_range])
///
/// `sum_range` is paired with `range` position by position; the shorter
/// of the two decides how many pairs there are.
pub fn fn_sumif(args: &[FormulaExpr], ctx: &mut EvaluationContext) -> FormulaResult<Value> {
    let range = ctx.flatten(&args[0])?;
    let matcher = CriteriaMatcher::new(&ctx.evaluate(&args[1])?);
    let sum_range = match args.get(2) {
        Some(arg) => ctx.flatten(arg)?,
        None => range.clone(),
    };

    let total = range
        .iter()
        .zip(&sum_range)
        .filter(|(test, _)| matcher.matches(test))
        .filter_map(|(_, v)| match v {
            Value::Number(n) => Some(*n),
            _ => None,
        })
        .sum();
    Ok(Value::Number(total))
}
